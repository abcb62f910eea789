// integration tests for the config command

use crate::common::*;
use std::fs;

fn run_config(args: &[&str], test_dir: &std::path::Path) -> std::process::Output {
    // use --no-json to get text output (stdout is piped in tests, which auto-enables JSON)
    let mut cmd_args = vec!["--no-json", "config"];
    cmd_args.extend(args);
    run_ifday(&cmd_args, test_dir)
}

fn read_config(test_dir: &std::path::Path) -> serde_json::Value {
    let content = fs::read_to_string(test_dir.join("config.json")).expect("config should exist");
    serde_json::from_str(&content).expect("config should be JSON")
}

// ============================================================================
// config show / path
// ============================================================================

#[test]
fn test_config_show_creates_defaults() {
    let test_dir = create_test_dir("config_show");

    let output = run_config(&["show"], &test_dir);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let shown: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(shown["settings"]["show_errors"], true);
    assert_eq!(shown["settings"]["timezone"], "local");
    assert_eq!(shown["settings"]["fuzzy_threshold"], 2);
    assert!(test_dir.join("config.json").exists());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_path_respects_override() {
    let test_dir = create_test_dir("config_path");
    let custom = test_dir.join("custom.json");

    let output = run_ifday(
        &["--no-json", "--config", custom.to_str().unwrap(), "config", "path"],
        &test_dir,
    );
    assert_eq!(stdout(&output).trim(), custom.display().to_string());

    let output = run_config(&["path"], &test_dir);
    assert_eq!(
        stdout(&output).trim(),
        test_dir.join("config.json").display().to_string()
    );

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// config set / reset
// ============================================================================

#[test]
fn test_config_set_values() {
    let test_dir = create_test_dir("config_set");

    let output = run_config(&["set", "settings.timezone", "UTC"], &test_dir);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Set settings.timezone = UTC"));

    run_config(&["set", "settings.show_errors", "off"], &test_dir);

    let config = read_config(&test_dir);
    assert_eq!(config["settings"]["timezone"], "utc");
    assert_eq!(config["settings"]["show_errors"], false);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_set_rejects_bad_values() {
    let test_dir = create_test_dir("config_set_bad");

    let output = run_config(&["set", "settings.timezone", "Mars/Olympus"], &test_dir);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Invalid timezone"));

    let output = run_config(&["set", "settings.animate", "true"], &test_dir);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Unknown config key"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_reset() {
    let test_dir = create_test_dir("config_reset");
    run_config(&["set", "settings.fuzzy_threshold", "5"], &test_dir);

    let output = run_config(&["reset"], &test_dir);
    assert!(output.status.success());
    assert_eq!(read_config(&test_dir)["settings"]["fuzzy_threshold"], 2);

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// config verify
// ============================================================================

#[test]
fn test_config_verify_valid() {
    let test_dir = create_test_dir("config_verify");
    run_config(&["show"], &test_dir);

    let output = run_config(&["verify"], &test_dir);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Configuration is valid"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_verify_reports_timezone() {
    let test_dir = create_test_dir("config_verify_tz");
    fs::write(
        test_dir.join("config.json"),
        r#"{ "settings": { "timezone": "Mars/Olympus" } }"#,
    )
    .unwrap();

    let output = run_config(&["verify"], &test_dir);
    assert_eq!(output.status.code(), Some(5));
    let text = stdout(&output);
    assert!(text.contains("Configuration has 1 error(s)"));
    assert!(text.contains("  - settings.timezone"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_config_verify_invalid_json() {
    let test_dir = create_test_dir("config_verify_json");
    fs::write(test_dir.join("config.json"), "{ invalid json }").unwrap();

    let output = run_config(&["verify"], &test_dir);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("invalid JSON"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_broken_config_fails_eval() {
    let test_dir = create_test_dir("config_broken");
    fs::write(test_dir.join("config.json"), "{ invalid json }").unwrap();

    let output = run_ifday(&["--no-json", "eval", "mon", "--date", "2025-12-15"], &test_dir);
    assert_eq!(output.status.code(), Some(5));

    cleanup_test_dir(&test_dir);
}
