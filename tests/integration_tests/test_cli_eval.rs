// integration tests for the eval command

use crate::common::*;

// 2025-12-15 is a monday
const MONDAY: &str = "2025-12-15";

// ============================================================================
// text output
// ============================================================================

#[test]
fn test_eval_true_and_false() {
    let test_dir = create_test_dir("eval_basic");

    let output = run_ifday(&["--no-json", "eval", "day == mon", "--date", MONDAY], &test_dir);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "true");

    let output = run_ifday(&["--no-json", "eval", "weekend", "--date", MONDAY], &test_dir);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "false");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_check_exit_codes() {
    let test_dir = create_test_dir("eval_check");

    let output = run_ifday(
        &["--no-json", "eval", "day in [mon..fri]", "--date", MONDAY, "--check"],
        &test_dir,
    );
    assert_eq!(output.status.code(), Some(0));

    let output = run_ifday(
        &["--no-json", "eval", "sat or sun", "--date", MONDAY, "--check"],
        &test_dir,
    );
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout(&output).trim(), "false");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_date_from_env() {
    let test_dir = create_test_dir("eval_env_date");

    let output = run_ifday_with_env(
        &["--no-json", "eval", "2nd monday"],
        &test_dir,
        &[("IFDAY_TEST_DATE", "2025-12-08")],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "true");

    // explicit --date wins over the environment
    let output = run_ifday_with_env(
        &["--no-json", "eval", "2nd monday", "--date", MONDAY],
        &test_dir,
        &[("IFDAY_TEST_DATE", "2025-12-08")],
    );
    assert_eq!(stdout(&output).trim(), "false");

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_invalid_date() {
    let test_dir = create_test_dir("eval_bad_date");

    let output = run_ifday(&["--no-json", "eval", "mon", "--date", "next week"], &test_dir);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("invalid date 'next week'"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_invalid_day_suggests_name() {
    let test_dir = create_test_dir("eval_invalid_day");

    let output = run_ifday(&["--no-json", "eval", "day == tuesdy", "--date", MONDAY], &test_dir);
    assert_eq!(output.status.code(), Some(2));

    let err = stderr(&output);
    assert!(err.contains("Error: Invalid day name(s) in condition: tuesdy"), "stderr: {}", err);
    assert!(err.contains("Did you mean: tuesday?"), "stderr: {}", err);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_syntax_error() {
    let test_dir = create_test_dir("eval_syntax");

    let output = run_ifday(&["--no-json", "eval", "day == mon AND", "--date", MONDAY], &test_dir);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("syntax error"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_quiet_prints_nothing() {
    let test_dir = create_test_dir("eval_quiet");

    let output = run_ifday(&["-q", "eval", "mon", "--date", MONDAY], &test_dir);
    assert!(output.status.success());
    assert!(stdout(&output).is_empty());

    cleanup_test_dir(&test_dir);
}

// ============================================================================
// JSON output
// ============================================================================

#[test]
fn test_eval_json_result() {
    let test_dir = create_test_dir("eval_json");

    let output = run_ifday(&["--json", "eval", "month == dec", "--date", MONDAY], &test_dir);
    assert!(output.status.success());

    let json = json_output(&output);
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["result"]["condition"], "month == dec");
    assert_eq!(json["result"]["date"], MONDAY);
    assert_eq!(json["result"]["value"], true);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_json_is_default_when_piped() {
    let test_dir = create_test_dir("eval_json_piped");

    let output = run_ifday(&["eval", "mon", "--date", MONDAY], &test_dir);
    let json = json_output(&output);
    assert_eq!(json["result"]["value"], true);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_json_error() {
    let test_dir = create_test_dir("eval_json_error");

    let output = run_ifday(&["--json", "eval", "month == smarch", "--date", MONDAY], &test_dir);
    assert_eq!(output.status.code(), Some(2));

    let json = json_output(&output);
    assert_eq!(json["error"]["code"], -32002);
    assert_eq!(json["error"]["data"]["kind"], "invalid_month");
    assert_eq!(
        json["error"]["message"],
        "Invalid month name(s) in condition: smarch"
    );

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_eval_safety_violation_json() {
    let test_dir = create_test_dir("eval_safety");

    let output = run_ifday(&["--json", "eval", "foo", "--date", MONDAY], &test_dir);
    assert_eq!(output.status.code(), Some(2));

    let json = json_output(&output);
    assert_eq!(json["error"]["data"]["kind"], "safety_violation");
    assert!(json["error"]["data"].get("suggestions").is_none());

    cleanup_test_dir(&test_dir);
}
