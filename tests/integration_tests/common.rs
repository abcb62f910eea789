// shared utilities for integration tests

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::atomic::{AtomicUsize, Ordering};

// counter for unique test directory names
static TEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// create a fresh temporary directory for one test
pub fn create_test_dir(name: &str) -> PathBuf {
    let count = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = env::temp_dir()
        .join("ifday_integration_tests")
        .join(format!("{}_{}_{}", name, std::process::id(), count));

    // clean up if exists
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }

    fs::create_dir_all(&dir).expect("Failed to create test directory");
    dir
}

/// clean up a test directory
pub fn cleanup_test_dir(path: &Path) {
    if path.exists() {
        fs::remove_dir_all(path).ok();
    }
}

/// get path to the built ifday binary
pub fn ifday_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ifday"))
}

fn command(args: &[&str], config_path: &Path) -> Command {
    let mut cmd = Command::new(ifday_binary_path());
    cmd.args(args)
        .env("IFDAY_CONFIG", config_path)
        .env_remove("IFDAY_TEST_DATE")
        .env_remove("RUST_LOG");
    cmd
}

/// run ifday with its config isolated under `test_dir`
#[allow(dead_code)]
pub fn run_ifday(args: &[&str], test_dir: &Path) -> Output {
    command(args, &test_dir.join("config.json"))
        .output()
        .expect("Failed to run ifday")
}

/// run ifday with extra environment variables
#[allow(dead_code)]
pub fn run_ifday_with_env(args: &[&str], test_dir: &Path, env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = command(args, &test_dir.join("config.json"));
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to run ifday")
}

/// run ifday feeding `input` on stdin
#[allow(dead_code)]
pub fn run_ifday_with_stdin(args: &[&str], test_dir: &Path, input: &str) -> Output {
    let mut child = command(args, &test_dir.join("config.json"))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn ifday");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for ifday")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[allow(dead_code)]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// parse a JSON-RPC line from stdout
#[allow(dead_code)]
pub fn json_output(output: &Output) -> serde_json::Value {
    serde_json::from_str(stdout(output).trim()).expect("stdout should be JSON")
}
