use crate::error::AppError;
use crate::model::Task;
use crate::query::{self, StatusFilter};
use crate::storage::json_store;
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

#[derive(Debug, Clone)]
pub struct ListView {
    pub tasks: Vec<Task>,
    pub total: usize,
}

/// Owns the in-memory task collection and keeps it synchronized with the
/// store file: every mutation saves the full collection before it is
/// committed to memory, so a failed save leaves memory and disk where they
/// were (rollback rather than a silent divergence).
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Loads the collection once for the session. A missing or unreadable
    /// store file still yields a usable (empty) store; the recovered-load
    /// diagnostic, if any, is handed back for the shell to surface.
    pub fn open(path: PathBuf) -> (Self, Option<AppError>) {
        let outcome = json_store::load_tasks(&path);
        (
            Self {
                path,
                tasks: outcome.tasks,
            },
            outcome.error,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Discards in-memory state and re-reads the store file.
    pub fn reload(&mut self) -> Option<AppError> {
        let outcome = json_store::load_tasks(&self.path);
        self.tasks = outcome.tasks;
        outcome.error
    }

    /// Forces a save of the current in-memory collection.
    pub fn persist(&self) -> Result<(), AppError> {
        json_store::save_tasks(&self.path, &self.tasks)
    }

    pub fn list(&self, filter: StatusFilter, search: &str) -> ListView {
        ListView {
            tasks: query::visible_tasks(&self.tasks, filter, search),
            total: self.tasks.len(),
        }
    }

    pub fn add(&mut self, text: &str) -> Result<Task, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("text is required"));
        }

        let task = Task {
            id: self.next_id(),
            text: trimmed.to_string(),
            done: false,
            created_at: now_minute_string()?,
        };

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        Ok(task)
    }

    /// Replaces a task's text. Unlike `add`, trimming to empty is accepted.
    pub fn update_text(&mut self, id: &str, new_text: &str) -> Result<Task, AppError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        next[index].text = new_text.trim().to_string();
        let updated = next[index].clone();
        self.commit(next)?;

        Ok(updated)
    }

    pub fn set_done(&mut self, id: &str, done: bool) -> Result<Task, AppError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        next[index].done = done;
        let updated = next[index].clone();
        self.commit(next)?;

        Ok(updated)
    }

    pub fn toggle_done(&mut self, id: &str) -> Result<Task, AppError> {
        let index = self.position(id)?;
        let done = !self.tasks[index].done;
        self.set_done(id, done)
    }

    pub fn remove(&mut self, id: &str) -> Result<Task, AppError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        Ok(removed)
    }

    /// Sets every task's done flag, saving once for the whole batch.
    pub fn mark_all(&mut self, done: bool) -> Result<usize, AppError> {
        let mut next = self.tasks.clone();
        for task in &mut next {
            task.done = done;
        }
        let touched = next.len();
        self.commit(next)?;

        Ok(touched)
    }

    /// Drops every completed task, keeping the survivors' relative order.
    pub fn purge_completed(&mut self) -> Result<usize, AppError> {
        let mut next = self.tasks.clone();
        next.retain(|task| !task.done);
        let removed = self.tasks.len() - next.len();
        self.commit(next)?;

        Ok(removed)
    }

    // Ids are opaque and compared exactly; anything that does not match,
    // blank included, is simply not found.
    fn position(&self, id: &str) -> Result<usize, AppError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::not_found("task not found"))
    }

    /// Save-then-swap: memory only takes the new collection once it is on
    /// disk.
    fn commit(&mut self, next: Vec<Task>) -> Result<(), AppError> {
        json_store::save_tasks(&self.path, &next)?;
        self.tasks = next;
        Ok(())
    }

    fn next_id(&self) -> String {
        let mut nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        loop {
            let id = format!("task-{nanos}");
            if !self.tasks.iter().any(|task| task.id == id) {
                return id;
            }
            nanos += 1;
        }
    }
}

fn now_minute_string() -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let now = OffsetDateTime::now_utc().to_offset(offset);
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]");
    now.format(&format)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
