//! Basic CLI tests.
//!
//! Each test points the binary at its own temporary data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lucent-cli").expect("binary is built");
    cmd.env("LUCENT_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("valid JSON output")
}

fn json_lines(output: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(output)
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("valid JSON line"))
        .collect()
}

#[test]
fn streak_show_starts_at_zero() {
    let dir = TempDir::new().unwrap();
    let out = cli(&dir).args(["streak", "show"]).output().unwrap();
    assert!(out.status.success());
    let value = json(&out.stdout);
    assert_eq!(value["count"], 0);
    assert!(value["date"].is_null());
}

#[test]
fn streak_record_counts_once_per_day() {
    let dir = TempDir::new().unwrap();

    let first = json(&cli(&dir).args(["streak", "record"]).output().unwrap().stdout);
    assert_eq!(first["count"], 1);
    assert_eq!(first["increased"], true);
    assert!(first["date"].is_string());

    let second = json(&cli(&dir).args(["streak", "record"]).output().unwrap().stdout);
    assert_eq!(second["count"], 1);
    assert_eq!(second["increased"], false);

    let shown = json(&cli(&dir).args(["streak", "show"]).output().unwrap().stdout);
    assert_eq!(shown["count"], 1);
}

#[test]
fn streak_reset_clears() {
    let dir = TempDir::new().unwrap();
    cli(&dir).args(["streak", "record"]).assert().success();
    let value = json(&cli(&dir).args(["streak", "reset"]).output().unwrap().stdout);
    assert_eq!(value["count"], 0);
    assert!(value["date"].is_null());
}

#[test]
fn config_get_default_and_set() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "get", "timer.work_minutes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("25"));

    cli(&dir)
        .args(["config", "set", "timer.work_minutes", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));

    cli(&dir)
        .args(["config", "get", "timer.work_minutes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("40"));
}

#[test]
fn config_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set", "timer.nope", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
    cli(&dir)
        .args(["config", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key: nope"));
}

#[test]
fn config_list_is_json() {
    let dir = TempDir::new().unwrap();
    let value = json(&cli(&dir).args(["config", "list"]).output().unwrap().stdout);
    assert_eq!(value["timer"]["break_minutes"], 5);
    assert_eq!(value["focus_lock"]["enabled_by_default"], false);
}

#[test]
fn session_status_shows_fresh_work_phase() {
    let dir = TempDir::new().unwrap();
    let out = cli(&dir)
        .args(["session", "--json"])
        .write_stdin("status\nquit\n")
        .output()
        .unwrap();
    assert!(out.status.success());
    let lines = json_lines(&out.stdout);
    let status = lines.last().expect("status line");
    assert_eq!(status["phase"], "work");
    assert_eq!(status["remaining_seconds"], 1500);
    assert_eq!(status["time"], "25:00");
    assert_eq!(status["lock_state"], "unlocked");
}

#[test]
fn session_focus_lock_exit_flow() {
    let dir = TempDir::new().unwrap();
    let out = cli(&dir)
        .args(["session", "--lock", "--json"])
        .write_stdin("start\nquit\nexit\ncancel\nexit\nconfirm\nstatus\nquit\n")
        .output()
        .unwrap();
    assert!(out.status.success());

    let lines = json_lines(&out.stdout);
    let types: Vec<&str> = lines
        .iter()
        .filter_map(|v| v["type"].as_str())
        .filter(|t| *t != "TimerTicked")
        .collect();
    assert_eq!(
        types,
        vec![
            "TimerStarted",
            "FocusLocked",
            "BackNavigationBlocked",
            "ExitConfirmationRequested",
            "ExitCancelled",
            "ExitConfirmationRequested",
            "TimerPaused",
            "FocusUnlocked",
        ]
    );

    let status = lines.last().unwrap();
    assert_eq!(status["lock_state"], "unlocked");
    assert_eq!(status["is_running"], false);
}

#[test]
fn session_respects_configured_durations() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "set", "timer.break_minutes", "10"])
        .assert()
        .success();
    let out = cli(&dir)
        .args(["session", "--json"])
        .write_stdin("reset break\nstatus\nquit\n")
        .output()
        .unwrap();
    let lines = json_lines(&out.stdout);
    let status = lines.last().unwrap();
    assert_eq!(status["phase"], "break");
    assert_eq!(status["remaining_seconds"], 600);
}
