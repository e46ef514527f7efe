//! # Data Models Module / 数据模型模块
//!
//! This module defines the result types that flow out of the execution
//! driver: per-unit outcomes, the report a plugin runtime hands back, and the
//! single process-level verdict the reducer folds them into.
//!
//! 此模块定义了从执行驱动器流出的结果类型：单元级结果、插件运行时返回的报告，
//! 以及归约器将其折叠而成的单一进程级裁决。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::core::engine::EngineId;
use crate::infra::t;

/// Exit code when every unit passed.
pub const EXIT_SUCCESS: u8 = 0;
/// Exit code when the matrix ran and at least one unit failed.
pub const EXIT_TESTS_FAILED: u8 = 1;
/// Exit code when setup failed before any unit ran.
pub const EXIT_SETUP_FAILED: u8 = 2;

/// Enumerates the possible reasons for a unit failure.
/// This helps in categorizing errors for reporting.
/// 枚举执行单元失败的可能原因。
/// 这有助于对错误进行分类，以便报告。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The plugin ran but its observable behavior did not match the expectations.
    /// 插件已运行，但其可观察行为与期望不符。
    Expectation,
    /// The plugin run exceeded the test's timeout.
    /// 插件运行超出了测试的超时时间。
    Timeout,
    /// The plugin runtime could not run the unit at all.
    /// 插件运行时根本无法运行该单元。
    RuntimeError,
    /// The task running the unit panicked.
    /// 运行该单元的任务发生了 panic。
    Panicked,
    /// The run was interrupted before the unit finished.
    /// 运行在单元结束之前被中断。
    Cancelled,
}

impl FailureReason {
    pub fn label(&self, locale: &str) -> String {
        match self {
            FailureReason::Expectation => t!("reason.expectation", locale = locale),
            FailureReason::Timeout => t!("reason.timeout", locale = locale),
            FailureReason::RuntimeError => t!("reason.runtime_error", locale = locale),
            FailureReason::Panicked => t!("reason.panicked", locale = locale),
            FailureReason::Cancelled => t!("reason.cancelled", locale = locale),
        }
        .to_string()
    }
}

/// Pass/fail verdict for a single execution unit.
/// 单个执行单元的通过/失败裁决。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed {
        reason: FailureReason,
        message: String,
    },
}

impl Outcome {
    pub fn failed(reason: FailureReason, message: impl Into<String>) -> Self {
        Outcome::Failed {
            reason,
            message: message.into(),
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }
}

/// What a plugin runtime reports back for one unit.
/// 插件运行时为一个单元返回的报告。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Captured output, kept for failure details and reports.
    pub output: String,
}

impl RunReport {
    pub fn passed(output: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Passed,
            output: output.into(),
        }
    }

    pub fn failed(
        reason: FailureReason,
        message: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            outcome: Outcome::failed(reason, message),
            output: output.into(),
        }
    }
}

/// Represents the final, recorded result of one execution unit.
/// 表示一个执行单元最终记录下来的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitResult {
    /// `<engine>::<test>` / 单元标识
    pub unit_id: String,
    pub engine: EngineId,
    pub case_name: String,
    pub outcome: Outcome,
    /// The complete captured output / 捕获的完整输出
    pub output: String,
    /// Wall-clock time spent on the unit / 单元耗费的时间
    pub duration: Duration,
}

impl UnitResult {
    pub fn is_failure(&self) -> bool {
        !self.outcome.is_passed()
    }

    pub fn failure_reason(&self) -> Option<FailureReason> {
        match &self.outcome {
            Outcome::Passed => None,
            Outcome::Failed { reason, .. } => Some(*reason),
        }
    }

    /// Gets the status of the result as a string for display.
    /// 以字符串形式获取结果的状态以供显示。
    pub fn get_status_str(&self, locale: &str) -> String {
        match &self.outcome {
            Outcome::Passed => t!("report.status_passed", locale = locale).to_string(),
            Outcome::Failed {
                reason: FailureReason::Timeout,
                ..
            } => t!("report.status_timeout", locale = locale).to_string(),
            Outcome::Failed { .. } => t!("report.status_failed", locale = locale).to_string(),
        }
    }

    /// Gets the appropriate CSS class for the result status.
    pub fn get_status_class(&self) -> &'static str {
        match &self.outcome {
            Outcome::Passed => "status-passed",
            Outcome::Failed {
                reason: FailureReason::Timeout,
                ..
            } => "status-timeout",
            Outcome::Failed { .. } => "status-failed",
        }
    }
}

/// The single verdict of a whole run.
/// 整个运行的单一裁决。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    Success { passed: usize },
    Failure { failed: Vec<String>, total: usize },
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessResult::Success { .. })
    }

    /// Ids of the failing units, in run order. Empty on success.
    pub fn failed_units(&self) -> &[String] {
        match self {
            ProcessResult::Success { .. } => &[],
            ProcessResult::Failure { failed, .. } => failed,
        }
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_TESTS_FAILED
        }
    }
}

impl fmt::Display for ProcessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessResult::Success { passed } => write!(f, "SUCCESS ({passed} passed)"),
            ProcessResult::Failure { failed, total } => write!(
                f,
                "FAILURE ({} of {} failed: {})",
                failed.len(),
                total,
                failed.join(", ")
            ),
        }
    }
}

/// Folds every unit outcome into one verdict: `Success` iff all passed.
/// A single failure anywhere yields `Failure` naming that unit.
///
/// 将所有单元结果折叠为一个裁决：当且仅当全部通过时为 `Success`。
/// 任何一处失败都会产生指明该单元的 `Failure`。
pub fn reduce(results: &[UnitResult]) -> ProcessResult {
    let failed: Vec<String> = results
        .iter()
        .filter(|r| r.is_failure())
        .map(|r| r.unit_id.clone())
        .collect();

    if failed.is_empty() {
        ProcessResult::Success {
            passed: results.len(),
        }
    } else {
        ProcessResult::Failure {
            failed,
            total: results.len(),
        }
    }
}
