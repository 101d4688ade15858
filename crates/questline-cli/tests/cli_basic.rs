//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a throwaway database
//! and verify outputs.

use std::path::Path;
use std::process::Command;

use tempfile::tempdir;

/// Run a CLI command against `db` and return (stdout, stderr, code).
fn run_cli(db: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "questline-cli", "--quiet", "--"])
        .arg("--db")
        .arg(db)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn profile_init_and_show() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("questline.db");

    let (stdout, stderr, code) = run_cli(&db, &["profile", "init"]);
    assert_eq!(code, 0, "profile init failed: {stderr}");
    assert!(stdout.contains("created profile"));

    let (stdout, _, code) = run_cli(&db, &["profile", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("level 1"));
}

#[test]
fn task_completion_rewards_once() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("questline.db");
    run_cli(&db, &["profile", "init"]);

    let (stdout, _, code) = run_cli(&db, &["task", "complete", "1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("+10 xp"));

    let (stdout, _, code) = run_cli(&db, &["task", "complete", "1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("already rewarded"));
}

#[test]
fn claim_without_definition_fails_cleanly() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("questline.db");
    run_cli(&db, &["profile", "init"]);

    let (_, stderr, code) = run_cli(&db, &["claim", "now"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn claim_after_define_succeeds() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("questline.db");
    run_cli(&db, &["profile", "init"]);
    let (_, stderr, code) = run_cli(&db, &["claim", "define", "1", "--value", "25"]);
    assert_eq!(code, 0, "define failed: {stderr}");

    let (stdout, _, code) = run_cli(&db, &["claim", "now"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("streak day 1"));

    // Second claim on the same day is rejected.
    let (_, stderr, code) = run_cli(&db, &["claim", "now"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already claimed"));
}

#[test]
fn challenge_add_then_completes_through_a_task() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("questline.db");
    run_cli(&db, &["profile", "init"]);

    let (stdout, stderr, code) = run_cli(
        &db,
        &[
            "challenges",
            "add",
            "finish one task",
            "--rule-type",
            "TASK_COMPLETION",
            "--reward-kind",
            "COINS",
            "--reward-value",
            "50",
        ],
    );
    assert_eq!(code, 0, "challenges add failed: {stderr}");
    assert!(stdout.contains("created challenge"));

    let (stdout, _, code) = run_cli(&db, &["challenges", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("finish one task"));
    assert!(stdout.contains("0/1"));

    let (stdout, _, code) = run_cli(&db, &["task", "complete", "1"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("+52 coins"));
}

#[test]
fn garden_show_and_water() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("questline.db");
    run_cli(&db, &["profile", "init"]);

    let (stdout, _, code) = run_cli(&db, &["garden", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("empty"));

    let (stdout, _, code) = run_cli(&db, &["garden", "plant", "cactus"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("planted CACTUS"));

    let (_, _, code) = run_cli(&db, &["garden", "water"]);
    assert_eq!(code, 0);

    let (_, stderr, code) = run_cli(&db, &["garden", "water"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already watered"));
}
