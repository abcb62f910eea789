// integration tests for the table command
//
// base 2025-12-22 is a monday, so rows run from monday 2025-12-15 to sunday 2025-12-21

use crate::common::*;

const BASE: &str = "2025-12-22";

/// days whose row is true, from JSON output
fn true_days(condition: &str, extra: &[&str]) -> Vec<String> {
    let test_dir = create_test_dir("table");
    let mut args = vec!["--json", "table", condition, "--date", BASE];
    args.extend(extra);

    let output = run_ifday(&args, &test_dir);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let json = json_output(&output);
    let days = json["result"]["rows"]
        .as_array()
        .expect("rows should be an array")
        .iter()
        .filter(|row| row["result"]["value"] == true)
        .map(|row| row["day"].as_str().unwrap_or_default().to_string())
        .collect();

    cleanup_test_dir(&test_dir);
    days
}

#[test]
fn test_table_rows_and_dates() {
    let test_dir = create_test_dir("table_rows");

    let output = run_ifday(&["--json", "table", "weekday", "--date", BASE], &test_dir);
    let json = json_output(&output);
    let rows = json["result"]["rows"].as_array().unwrap();

    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["day"], "monday");
    assert_eq!(rows[0]["date"], "2025-12-15");
    assert_eq!(rows[6]["day"], "sunday");
    assert_eq!(rows[6]["date"], "2025-12-21");
    assert_eq!(json["result"]["anchored"], false);

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_table_weekday_ranges() {
    assert_eq!(
        true_days("day in [mon..fri]", &[]),
        vec!["monday", "tuesday", "wednesday", "thursday", "friday"]
    );
    assert_eq!(true_days("day in [sat..mon]", &[]), vec!["monday", "saturday", "sunday"]);
}

#[test]
fn test_table_relative_days() {
    assert_eq!(true_days("tomorrow is tue", &[]), vec!["monday"]);
    assert_eq!(true_days("yesterday is fri or tomorrow is mon", &[]), vec!["saturday", "sunday"]);
    assert_eq!(true_days("day+1 == sat", &[]), vec!["friday"]);
}

#[test]
fn test_table_shorthand() {
    assert_eq!(true_days("mon, wed | fri", &[]), vec!["monday", "wednesday", "friday"]);
    assert_eq!(true_days("(mon and wed) or fri", &[]), vec!["friday"]);
}

#[test]
fn test_table_anchored_class() {
    // anchored on a monday, weekend is false for every row
    assert!(true_days("weekend", &["--anchored"]).is_empty());
    assert_eq!(true_days("weekend", &[]), vec!["saturday", "sunday"]);
}

#[test]
fn test_table_text_output() {
    let test_dir = create_test_dir("table_text");

    let output = run_ifday(&["--no-json", "table", "day == wed", "--date", BASE], &test_dir);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[2].starts_with("wednesday"));
    assert!(lines[2].contains("2025-12-17"));
    assert!(lines[2].ends_with("true"));
    assert!(lines[0].ends_with("false"));

    cleanup_test_dir(&test_dir);
}

#[test]
fn test_table_invalid_condition() {
    let test_dir = create_test_dir("table_invalid");

    let output = run_ifday(&["--no-json", "table", "day == fuday", "--date", BASE], &test_dir);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Invalid day name(s) in condition: fuday"));

    cleanup_test_dir(&test_dir);
}
