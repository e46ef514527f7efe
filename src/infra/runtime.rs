//! # Process Plugin Runtime / 进程插件运行时
//!
//! A [`PluginRuntime`] that launches each engine as a child process. The
//! engine's command template is rendered with the effective configuration,
//! the test's stimulus is delivered through arguments, environment and stdin,
//! and the captured streams are checked against the test's expectations.
//!
//! 将每个引擎作为子进程启动的 [`PluginRuntime`]。引擎命令模板使用有效配置渲染，
//! 测试的激励通过参数、环境变量和 stdin 传递，捕获的输出流再与测试期望进行比对。

use anyhow::{Context, Result, anyhow};
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::process::Command;

use crate::{
    core::{
        config::Expectations,
        engine::EngineRegistry,
        execution::PluginRuntime,
        models::{FailureReason, RunReport},
        planner::ExecutionUnit,
    },
    infra::{command, t},
};

/// Environment variable carrying the engine id.
pub const ENGINE_ENV: &str = "PLUGIN_ENGINE";
/// Environment variable carrying the effective plugin configuration path.
pub const CONFIG_ENV: &str = "PLUGIN_CONFIG_PATH";
/// Environment variable carrying the effective minimum log level.
pub const LOG_LEVEL_ENV: &str = "PLUGIN_MIN_LOG_LEVEL";

/// Runs units by spawning the engine command registered for them.
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    registry: EngineRegistry,
}

impl ProcessRuntime {
    pub fn new(registry: EngineRegistry) -> Self {
        Self { registry }
    }

    /// The full argument vector used for `unit`: rendered template plus the
    /// test's own arguments.
    pub fn command_line(&self, unit: &ExecutionUnit) -> Result<Vec<String>> {
        let spec = self
            .registry
            .get(unit.engine())
            .ok_or_else(|| anyhow!("engine '{}' is not registered", unit.engine()))?;
        let mut argv = spec.render(unit.config());
        argv.extend(unit.case().args.iter().cloned());
        Ok(argv)
    }

    async fn run(&self, unit: &ExecutionUnit) -> Result<RunReport> {
        let case = unit.case();
        let config = unit.config();
        let argv = self.command_line(unit)?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| anyhow!("engine '{}' rendered an empty command", unit.engine()))?;
        let command_string =
            shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(args).env(ENGINE_ENV, unit.engine().as_str());
        if !config.config_path.as_os_str().is_empty() {
            cmd.env(CONFIG_ENV, &config.config_path);
        }
        if config.min_log_level.is_defined() {
            cmd.env(LOG_LEVEL_ENV, config.min_log_level.as_str());
        }
        cmd.envs(&case.env);

        tracing::trace!(unit = unit.id(), command = %command_string, "spawning engine");
        let capture = command::spawn_and_capture(cmd, case.input.as_deref());

        let captured = match case.timeout_secs {
            Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), capture).await {
                Ok(res) => res,
                Err(_) => {
                    return Ok(RunReport::failed(
                        FailureReason::Timeout,
                        t!("run.unit_timeout", timeout = secs).to_string(),
                        format!("{} {command_string}\n", t!("run.command_prefix")),
                    ));
                }
            },
            None => capture.await,
        }
        .with_context(|| format!("Failed to run engine command: {command_string}"))?;

        let output = format!(
            "{} {command_string}\n{}",
            t!("run.command_prefix"),
            captured.combined()
        );
        let mismatches = check_expectations(
            &case.expect,
            captured.status.code(),
            &captured.stdout,
            &captured.stderr,
        );

        if mismatches.is_empty() {
            Ok(RunReport::passed(output))
        } else {
            Ok(RunReport::failed(
                FailureReason::Expectation,
                mismatches.join("; "),
                output,
            ))
        }
    }
}

impl PluginRuntime for ProcessRuntime {
    fn invoke<'a>(&'a self, unit: &'a ExecutionUnit) -> BoxFuture<'a, Result<RunReport>> {
        Box::pin(self.run(unit))
    }
}

/// Compares one captured run with the test's expectations.
///
/// # Returns
/// One human-readable line per unmet expectation; empty when all hold.
pub fn check_expectations(
    expect: &Expectations,
    exit_code: Option<i32>,
    stdout: &str,
    stderr: &str,
) -> Vec<String> {
    let mut mismatches = Vec::new();

    match exit_code {
        Some(code) if code == expect.exit_code => {}
        Some(code) => mismatches.push(format!(
            "expected exit code {}, got {code}",
            expect.exit_code
        )),
        None => mismatches.push(format!(
            "expected exit code {}, but the engine was terminated by a signal",
            expect.exit_code
        )),
    }

    for needle in &expect.stdout_contains {
        if !stdout.contains(needle.as_str()) {
            mismatches.push(format!("stdout does not contain {needle:?}"));
        }
    }
    for needle in &expect.stdout_not_contains {
        if stdout.contains(needle.as_str()) {
            mismatches.push(format!("stdout unexpectedly contains {needle:?}"));
        }
    }
    for needle in &expect.stderr_contains {
        if !stderr.contains(needle.as_str()) {
            mismatches.push(format!("stderr does not contain {needle:?}"));
        }
    }

    mismatches
}
