// integration tests for the render and cache-age commands

use crate::common::*;
use std::fs;

// 2025-12-15 is a monday
const MONDAY: &str = "2025-12-15";

const PAGE: &str = "Opening hours\n\
<ifday day in [mon..fri]>Open 9-17<else>Closed</ifday>\n\
<ifday month == dec>Happy holidays!</ifday>\n";

#[test]
fn test_render_file() {
    let test_dir = create_test_dir("render_file");
    let page = test_dir.join("page.txt");
    fs::write(&page, PAGE).unwrap();

    let output = run_ifday(
        &["--no-json", "render", page.to_str().unwrap(), "--date", MONDAY],
        &test_dir,
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "Opening hours\nOpen 9-17\nHappy holidays!\n");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_render_else_branch_from_stdin() {
    let test_dir = create_test_dir("render_stdin");

    let output = run_ifday_with_stdin(
        &["--no-json", "render", "-", "--date", "2025-12-20"],
        &test_dir,
        "<ifday weekday>work<else>rest</ifday>",
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "rest");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_render_error_banner_and_hide_errors() {
    let test_dir = create_test_dir("render_errors");
    let page = "before <ifday day == fuday>x</ifday> after";

    let output = run_ifday_with_stdin(&["--no-json", "render", "--date", MONDAY], &test_dir, page);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("before <div class=\"plugin_ifday_error\">"));
    assert!(text.contains("Invalid day name(s) in condition: fuday"));
    assert!(text.ends_with("</div> after"));

    let output = run_ifday_with_stdin(
        &["--no-json", "render", "--date", MONDAY, "--hide-errors"],
        &test_dir,
        page,
    );
    assert_eq!(stdout(&output), "before  after");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_render_show_errors_from_config() {
    let test_dir = create_test_dir("render_config");
    fs::write(
        test_dir.join("config.json"),
        r#"{ "settings": { "show_errors": false } }"#,
    )
    .unwrap();
    let page = "<ifday month == smarch>x</ifday>";

    let output = run_ifday_with_stdin(&["--no-json", "render", "--date", MONDAY], &test_dir, page);
    assert_eq!(stdout(&output), "");

    // flag overrides the config
    let output = run_ifday_with_stdin(
        &["--no-json", "render", "--date", MONDAY, "--show-errors"],
        &test_dir,
        page,
    );
    assert!(stdout(&output).contains("plugin_ifday_error"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_render_json() {
    let test_dir = create_test_dir("render_json");

    let output = run_ifday_with_stdin(&["--json", "render", "--date", MONDAY], &test_dir, PAGE);
    let json = json_output(&output);
    assert_eq!(json["result"]["date"], MONDAY);
    assert_eq!(json["result"]["blocks"], 2);
    assert_eq!(
        json["result"]["output"],
        "Opening hours\nOpen 9-17\nHappy holidays!\n"
    );

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_render_missing_file() {
    let test_dir = create_test_dir("render_missing");
    let missing = test_dir.join("missing.txt");

    let output = run_ifday(
        &["--no-json", "render", missing.to_str().unwrap(), "--date", MONDAY],
        &test_dir,
    );
    assert!(!output.status.success());

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_cache_age() {
    let test_dir = create_test_dir("cache_age");

    let output = run_ifday_with_stdin(
        &["--no-json", "cache-age", "--date", "2025-12-15 23:00:00"],
        &test_dir,
        PAGE,
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "3600");

    // never below a minute
    let output = run_ifday_with_stdin(
        &["--no-json", "cache-age", "--date", "2025-12-15 23:59:30"],
        &test_dir,
        PAGE,
    );
    assert_eq!(stdout(&output).trim(), "60");

    let output =
        run_ifday_with_stdin(&["--no-json", "cache-age", "--date", MONDAY], &test_dir, "plain");
    assert_eq!(stdout(&output).trim(), "none");

    let output =
        run_ifday_with_stdin(&["--json", "cache-age", "--date", MONDAY], &test_dir, "plain");
    assert!(json_output(&output)["result"]["age"].is_null());

    cleanup_test_dir(&test_dir);
}
