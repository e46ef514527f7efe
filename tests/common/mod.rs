// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::{TempDir, tempdir};

use plugin_matrix_runner::core::config::{LogLevel, RuntimeConfig, TestCase};

/// A stand-in plugin run through `sh`. It prints the engine it runs on and
/// the effective log level; its first argument selects extra behavior
/// (`sleep`, `stdin`, `binary`, `fail`).
pub const PLUGIN_SCRIPT: &str = r#"#!/bin/sh
echo "engine=$PLUGIN_ENGINE level=$PLUGIN_MIN_LOG_LEVEL"
if [ -n "$PLUGIN_CONFIG_PATH" ]; then
  echo "config=$PLUGIN_CONFIG_PATH"
fi
if [ "$1" = "sleep" ]; then
  sleep 5
fi
if [ "$1" = "stdin" ]; then
  cat
fi
if [ "$1" = "binary" ]; then
  printf 'hello \377\n'
  echo PANIC
fi
if [ "$1" = "fail" ]; then
  echo "plugin refused the input" >&2
  exit 3
fi
exit 0
"#;

/// Creates a temporary directory holding `plugin.sh`.
pub fn setup_plugin_dir() -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    fs::write(temp_dir.path().join("plugin.sh"), PLUGIN_SCRIPT).expect("Failed to write plugin.sh");
    temp_dir
}

/// Writes `content` as `name` inside `temp_dir` and returns its path.
pub fn write_suite(temp_dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write suite");
    path
}

/// A suite with one passing and one failing test, pointing at `plugin.sh`.
pub fn mixed_suite(temp_dir: &TempDir) -> PathBuf {
    write_suite(
        temp_dir,
        "suite.toml",
        r#"
[runtime]
plugin_path = "plugin.sh"
min_log_level = "INFO"

[[test]]
name = "t1"
expect = { stdout_contains = ["level=INFO"] }

[[test]]
name = "t2"
args = ["fail"]
"#,
    )
}

/// A suite whose tests all pass.
pub fn passing_suite(temp_dir: &TempDir) -> PathBuf {
    write_suite(
        temp_dir,
        "passing.toml",
        r#"
[runtime]
plugin_path = "plugin.sh"

[[test]]
name = "greets"
expect = { stdout_contains = ["engine="] }

[[test]]
name = "echoes"
args = ["stdin"]
input = "ping"
expect = { stdout_contains = ["ping"] }
"#,
    )
}

pub fn runtime_config(plugin: &str, level: LogLevel) -> RuntimeConfig {
    RuntimeConfig {
        plugin_path: PathBuf::from(plugin),
        config_path: PathBuf::new(),
        min_log_level: level,
    }
}

pub fn test_cases(names: &[&str]) -> Vec<TestCase> {
    names.iter().map(|name| TestCase::named(*name)).collect()
}
