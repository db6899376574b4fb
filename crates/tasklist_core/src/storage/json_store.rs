use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
pub const STORE_PATH_ENV: &str = "TASKLIST_STORE_PATH";
const STORE_FILE_NAME: &str = "todos.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

/// Result of a load attempt. `tasks` is always usable; a missing file is
/// an empty collection with no error, while an unreadable or mis-shaped
/// document yields an empty collection plus the diagnostic that explains
/// what was discarded.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub tasks: Vec<Task>,
    pub error: Option<AppError>,
}

impl LoadOutcome {
    fn empty() -> Self {
        Self {
            tasks: Vec::new(),
            error: None,
        }
    }

    fn recovered(error: AppError) -> Self {
        Self {
            tasks: Vec::new(),
            error: Some(error),
        }
    }
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("tasklist")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("tasklist")
            .join(STORE_FILE_NAME))
    }
}

/// Reads the persisted collection. Never fails: anything the adapter cannot
/// turn into tasks becomes an empty collection with the cause recorded in
/// `LoadOutcome::error`.
pub fn load_tasks(path: &Path) -> LoadOutcome {
    if !path.exists() {
        return LoadOutcome::empty();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => return LoadOutcome::recovered(AppError::io(err.to_string())),
    };

    match parse_document(&content) {
        Ok(tasks) => LoadOutcome {
            tasks,
            error: None,
        },
        Err(err) => LoadOutcome::recovered(err),
    }
}

fn parse_document(content: &str) -> Result<Vec<Task>, AppError> {
    if let Ok(stored) = serde_json::from_str::<StoredTasks>(content) {
        if !(1..=SCHEMA_VERSION).contains(&stored.schema_version) {
            return Err(AppError::invalid_data("schema_version mismatch"));
        }
        return Ok(stored.tasks);
    }

    // Legacy shape: a bare array of task records.
    serde_json::from_str::<Vec<Task>>(content)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Serializes the full collection and replaces the store file. The document
/// is written next to the target and renamed into place so a concurrent
/// reader never sees a half-written file.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;

    let tmp_path = tmp_sibling(path);
    std::fs::write(&tmp_path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&tmp_path, permissions)
            .map_err(|err| AppError::io(err.to_string()))?;
    }

    std::fs::rename(&tmp_path, path).map_err(|err| {
        std::fs::remove_file(&tmp_path).ok();
        AppError::io(err.to_string())
    })?;

    Ok(())
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
