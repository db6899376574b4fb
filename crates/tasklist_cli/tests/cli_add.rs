use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

fn run(store_path: &PathBuf, args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    Command::new(exe)
        .args(args)
        .env("TASKLIST_STORE_PATH", store_path)
        .env("TASKLIST_CONFIG_PATH", temp_path("no-config.json"))
        .output()
        .expect("failed to run tasklist")
}

#[test]
fn add_appends_task_and_persists() {
    let store_path = temp_path("cli-add.json");

    let output = run(&store_path, &["add", "Buy milk"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added task: Buy milk"));

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    let tasks = document["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["text"], "Buy milk");
    assert_eq!(tasks[0]["done"], false);
    assert!(tasks[0]["id"].as_str().unwrap().starts_with("task-"));
}

#[test]
fn add_trims_text() {
    let store_path = temp_path("cli-add-trim.json");

    let output = run(&store_path, &["add", "  Walk dog  "]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    let document: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(document["tasks"][0]["text"], "Walk dog");
}

#[test]
fn add_rejects_blank_text_and_persists_nothing() {
    let store_path = temp_path("cli-add-blank.json");

    let output = run(&store_path, &["add", "   "]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid_input"));
    assert!(!store_path.exists());
}

#[test]
fn add_json_outputs_task_record() {
    let store_path = temp_path("cli-add-json.json");

    let output = run(&store_path, &["add", "Buy milk", "--json"]);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let task: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(task["text"], "Buy milk");
    assert_eq!(task["done"], false);
    assert!(task["created_at"].as_str().unwrap().len() >= 16);
}
