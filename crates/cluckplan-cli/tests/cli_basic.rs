//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_cluckplan"))
        .args(args)
        .env("CLUCKPLAN_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_task_add_toggle_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let task = run_json(dir.path(), &["task", "add", "Collect eggs", "--category", "personal"]);
    assert_eq!(task["title"], "Collect eggs");
    assert_eq!(task["category"], "personal");
    let id = task["id"].as_str().unwrap().to_string();

    let toggled = run_json(dir.path(), &["task", "toggle", &id]);
    assert_eq!(toggled["is_completed"], true);

    let stats = run_json(dir.path(), &["stats", "show"]);
    assert_eq!(stats["statistics"]["feathers_earned"], 5);
    assert_eq!(stats["statistics"]["tasks_completed"], 1);

    let pending = run_json(dir.path(), &["task", "list", "--pending"]);
    assert_eq!(pending.as_array().unwrap().len(), 0);

    run_json(dir.path(), &["task", "add", "Fix fence"]);
    let progress = run_json(dir.path(), &["task", "progress"]);
    assert_eq!(progress["completed"], 1);
    assert_eq!(progress["total"], 2);
    assert_eq!(progress["progress"], 0.5);
}

#[test]
fn test_unknown_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "toggle", "missing"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr was: {stderr}");
}

#[test]
fn test_focus_complete_awards_minutes() {
    let dir = tempfile::tempdir().unwrap();
    let session = run_json(dir.path(), &["focus", "add", "Write", "--minutes", "25"]);
    let id = session["id"].as_str().unwrap().to_string();

    run_json(dir.path(), &["focus", "start", &id]);
    let done = run_json(dir.path(), &["focus", "complete", &id, "--actual-secs", "125"]);
    assert_eq!(done["feathers"], 2);
    assert_eq!(done["session"]["is_completed"], true);
}

#[test]
fn test_game_play_records_score() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "game.round_secs", "5"]);
    let played = run_json(dir.path(), &["game", "play", "--seed", "42"]);
    let score = played["summary"]["final_score"].as_u64().unwrap();
    // About 5 seconds at 60 Hz.
    let ticks = played["ticks"].as_u64().unwrap();
    assert!((300..=302).contains(&ticks), "ticks = {ticks}");
    assert_eq!(played["best_game_score"].as_u64().unwrap(), score);
    assert_eq!(played["feathers_balance"].as_u64().unwrap(), score / 10);
}

#[test]
fn test_theme_purchase_without_feathers_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["game", "theme", "night"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not enough feathers"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "game.round_secs", "45"]);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "game.round_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "45");

    let (_, _, code) = run_cli(dir.path(), &["config", "get", "game.nope"]);
    assert_eq!(code, 1);
}
