//! Integration tests for the `roster` CLI.
//!
//! Each test works in a temp directory, runs `roster` as a subprocess,
//! and verifies stdout and/or the roster file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `roster` binary.
fn roster_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("roster");
    path
}

/// Run `roster` in `dir`, return (stdout, stderr, success).
fn run_roster(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(roster_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run roster");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `roster` expecting success, return stdout.
fn run_roster_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_roster(dir, args);
    if !success {
        panic!(
            "roster {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn add(dir: &Path, name: &str, level: &str, server: &str, class: &str) {
    let user = format!("{}_acct", name.to_lowercase());
    run_roster_ok(
        dir,
        &[
            "add",
            "--name",
            name,
            "--level",
            level,
            "--server",
            server,
            "--class",
            class,
            "--username",
            &user,
            "--password",
            "pw",
        ],
    );
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_creates_default_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_roster_ok(tmp.path(), &["list"]);
    assert!(out.starts_with("== All ==\nBard (0)\n"));
    assert!(out.contains("Shadow Knight (0)"));

    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(doc["accounts"], serde_json::json!([]));
    assert_eq!(doc["last_server"], "All");
}

#[test]
fn test_list_groups_by_class() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Zeb", "50", "Blue", "Wizard");

    let out = run_roster_ok(tmp.path(), &["list"]);
    assert!(out.contains("Wizard (1)"));
    assert!(out.contains("Zeb (Lvl 50)"));
    assert!(out.contains("User: zeb_acct"));

    let red = run_roster_ok(tmp.path(), &["list", "--server", "red"]);
    assert!(red.contains("== Red =="));
    assert!(red.contains("Wizard (0)"));
    assert!(!red.contains("Zeb"));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Zeb", "50", "Blue", "Wizard");

    let out = run_roster_ok(tmp.path(), &["list", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["filter"], "All");
    let classes = json["classes"].as_array().unwrap();
    assert_eq!(classes.len(), 14);
    let wizard = classes.iter().find(|c| c["class"] == "Wizard").unwrap();
    assert_eq!(wizard["count"], 1);
    assert_eq!(wizard["rows"][0]["name"], "Zeb");
    assert_eq!(wizard["rows"][0]["level"], 50);
}

#[test]
fn test_list_rejects_unknown_server() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_roster(tmp.path(), &["list", "--server", "Purple"]);
    assert!(!success);
    assert!(stderr.starts_with("error: unknown server \"Purple\""));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_assigns_ids() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Zeb", "50", "Blue", "Wizard");
    let out = run_roster_ok(
        tmp.path(),
        &[
            "add", "--name", "Amy", "--level", "12", "--server", "red", "--class", "rogue",
            "--username", "amy", "--password", "pw", "--note", "crafter",
        ],
    );
    assert_eq!(out.trim(), "added Amy - Rogue (Lvl 12) (C-002)");

    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(doc["accounts"][0]["id"], "C-001");
    assert_eq!(doc["accounts"][1]["server"], "Red");
    assert_eq!(doc["accounts"][1]["class"], "Rogue");
    assert_eq!(doc["accounts"][1]["note"], "crafter");
}

#[test]
fn test_add_invalid_level_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_roster(
        tmp.path(),
        &[
            "add", "--name", "Zeb", "--level", "nine", "--server", "Blue", "--class",
            "Wizard", "--username", "u", "--password", "p",
        ],
    );
    assert!(!success);
    assert!(stderr.contains("error: level must be a whole number"));

    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(doc["accounts"], serde_json::json!([]));
}

#[test]
fn test_select_updates_recent() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Zeb", "50", "Blue", "Wizard");
    add(tmp.path(), "Amy", "12", "Red", "Rogue");

    for name in ["Zeb", "Amy", "Zeb"] {
        run_roster_ok(tmp.path(), &["select", name]);
    }
    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(doc["recent"], serde_json::json!(["C-002", "C-001"]));
}

#[test]
fn test_select_unknown_name_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_roster(tmp.path(), &["select", "Nobody"]);
    assert!(!success);
    assert_eq!(stderr.trim(), "error: character not found: Nobody");
}

#[test]
fn test_fav_toggles() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Zeb", "50", "Blue", "Wizard");

    let out = run_roster_ok(tmp.path(), &["fav", "Zeb"]);
    assert_eq!(out.trim(), "Zeb added to favorites");
    let list = run_roster_ok(tmp.path(), &["list"]);
    assert!(list.contains("Favorites"));
    assert!(list.contains("Zeb - Wizard (Lvl 50)"));

    let out = run_roster_ok(tmp.path(), &["fav", "Zeb"]);
    assert_eq!(out.trim(), "Zeb removed from favorites");
    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(doc["favorites"], serde_json::json!([]));
}

#[test]
fn test_delete_requires_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    add(tmp.path(), "Zeb", "50", "Blue", "Wizard");
    run_roster_ok(tmp.path(), &["fav", "Zeb"]);
    run_roster_ok(tmp.path(), &["select", "Zeb"]);

    let (_, stderr, success) = run_roster(tmp.path(), &["delete", "Zeb"]);
    assert!(!success);
    assert!(stderr.contains("--yes"));

    let out = run_roster_ok(tmp.path(), &["delete", "Zeb", "--yes"]);
    assert_eq!(out.trim(), "deleted Zeb");
    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(doc["accounts"], serde_json::json!([]));
    assert_eq!(doc["favorites"], serde_json::json!([]));
    assert_eq!(doc["recent"], serde_json::json!([]));
}

#[test]
fn test_window_settings() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_roster_ok(tmp.path(), &["window"]);
    assert_eq!(out.trim(), "position 1000,100  size 420x700  alpha 0.95");

    let out = run_roster_ok(
        tmp.path(),
        &["window", "--x", "-20", "--width", "500", "--alpha", "3"],
    );
    assert_eq!(out.trim(), "position -20,100  size 500x700  alpha 1");

    let doc = read_json(&tmp.path().join("act.txt"));
    assert_eq!(
        doc["window_position"],
        serde_json::json!({"x": -20, "y": 100, "width": 500, "height": 700})
    );
    assert_eq!(doc["alpha"], 1.0);
}

#[test]
fn test_file_flag_and_corrupt_recovery() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("alts.json");
    fs::write(&data, "{ not json").unwrap();

    let (stdout, stderr, success) =
        run_roster(tmp.path(), &["-f", data.to_str().unwrap(), "list"]);
    assert!(success);
    assert!(stdout.contains("Wizard (0)"));
    assert!(stderr.contains("was unreadable and has been reset"));

    let log = fs::read_to_string(tmp.path().join(".roster-recovery.log")).unwrap();
    assert!(log.contains("[parser]"));
    assert!(log.contains("{ not json"));
    assert!(!tmp.path().join("act.txt").exists());
}
