use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn uuidy_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("uuidy");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    // Search is disabled so tests never touch the network.
    let config_content = format!(
        r#"[db]
path = "{}/data/uuidy.sqlite"

[search]
provider = "disabled"

[cache]
ttl_days = 30

[server]
bind = "127.0.0.1:7332"
"#,
        root.display()
    );

    let config_path = config_dir.join("uuidy.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_uuidy(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = uuidy_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run uuidy binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, stdout))
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_uuidy(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/uuidy.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_uuidy(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_uuidy(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_classify_known_service() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_uuidy(
        &config_path,
        &["classify", "0000180F-0000-1000-8000-00805F9B34FB"],
    );
    assert!(success, "classify failed: stderr={}", stderr);

    let json = parse_json(&stdout);
    assert_eq!(json["uuid"], "0000180f-0000-1000-8000-00805f9b34fb");
    assert_eq!(json["name"], "Battery Service");
    assert_eq!(json["type"], "Standard BLE Service");
    assert_eq!(json["confidence"], "high");
    assert_eq!(json["cached"], false);
}

#[test]
fn test_classify_unknown_without_search() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) =
        run_uuidy(&config_path, &["classify", "12345678123412341234123456789abc"]);
    assert!(success, "classify failed: stderr={}", stderr);

    let json = parse_json(&stdout);
    assert_eq!(json["uuid"], "12345678-1234-1234-1234-123456789abc");
    assert_eq!(json["type"], "Unknown");
    assert_eq!(json["name"], "Unknown");
    assert_eq!(json["confidence"], "low");
    assert_eq!(json["sources"].as_array().unwrap().len(), 0);
}

#[test]
fn test_second_classify_is_cached() {
    let (_tmp, config_path) = setup_test_env();

    let (first, _, ok1) = run_uuidy(
        &config_path,
        &["classify", "6e400001-b5a3-f393-e0a9-e50e24dcca9e"],
    );
    assert!(ok1);
    let (second, _, ok2) = run_uuidy(
        &config_path,
        &["classify", "6E400001B5A3F393E0A9E50E24DCCA9E"],
    );
    assert!(ok2);

    let first = parse_json(&first);
    let second = parse_json(&second);
    assert_eq!(first["cached"], false);
    assert_eq!(second["cached"], true);
    assert_eq!(first["uuid"], second["uuid"]);
    assert_eq!(first["created_at"], second["created_at"]);
}

#[test]
fn test_classify_invalid_uuid_fails() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_uuidy(&config_path, &["classify", "invalid-uuid"]);
    assert!(!success, "expected failure, got stdout={}", stdout);
    assert!(stderr.contains("Invalid UUID format"));
}

#[test]
fn test_get_after_classify() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, ok) = run_uuidy(
        &config_path,
        &["classify", "0000180d-0000-1000-8000-00805f9b34fb"],
    );
    assert!(ok);

    let (stdout, stderr, success) =
        run_uuidy(&config_path, &["get", "0000180d00001000800000805f9b34fb"]);
    assert!(success, "get failed: stderr={}", stderr);
    let json = parse_json(&stdout);
    assert_eq!(json["name"], "Heart Rate");
    assert_eq!(json["cached"], true);
}

#[test]
fn test_get_missing_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_uuidy(&config_path, &["init"]);

    let (_, stderr, success) = run_uuidy(
        &config_path,
        &["get", "0000180d-0000-1000-8000-00805f9b34fb"],
    );
    assert!(!success);
    assert!(stderr.contains("no classification stored"));
}

#[test]
fn test_known_lists_services_without_config() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist.toml");

    let (stdout, stderr, success) = run_uuidy(&missing, &["known"]);
    assert!(success, "known failed: stderr={}", stderr);
    assert!(stdout.starts_with("36 known services:"));
    assert!(stdout.contains("0000180f-0000-1000-8000-00805f9b34fb"));
    assert!(stdout.contains("Battery Service"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist.toml");

    let (_, stderr, success) = run_uuidy(&missing, &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
