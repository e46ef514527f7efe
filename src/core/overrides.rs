//! # Override Resolver / 覆盖解析器
//!
//! Merges the suite's runtime settings with values supplied from outside the
//! document (command-line flags). Each field is decided on its own: a present
//! override replaces the suite value, an absent one keeps it.
//!
//! A log-level override of `UNDEFINED`, or text that names no level at all,
//! counts as absent. Flags left at their default must not clobber what the
//! suite says, so this is a soft override and never an error.
//!
//! 将测试套件的运行时设置与文档之外提供的值（命令行参数）合并。
//! 每个字段独立决定：存在的覆盖值替换套件值，缺失的则保留套件值。
//! 日志级别覆盖为 `UNDEFINED` 或无法识别的文本时视为缺失，而不是错误。

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::core::config::{LogLevel, RuntimeConfig, TestCase};

/// Header printed in front of the effective configuration dump.
pub const TRACE_DUMP_HEADER: &str = "TRACE from runner: final config:";

/// Externally supplied replacements for suite runtime settings.
/// 外部提供的、用于替换套件运行时设置的值。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Override {
    pub plugin_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub min_log_level: Option<LogLevel>,
}

impl Override {
    /// An override with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plugin artifact override; an empty path stays absent.
    pub fn with_plugin_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.plugin_path = non_empty(path.into());
        self
    }

    /// Sets the plugin configuration override; an empty path stays absent.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = non_empty(path.into());
        self
    }

    /// Sets the log level override; `Undefined` stays absent.
    pub fn with_min_log_level(mut self, level: LogLevel) -> Self {
        self.min_log_level = Some(level).filter(LogLevel::is_defined);
        self
    }

    /// Sets the log level override from flag text.
    /// Unrecognized text is logged and treated as absent.
    pub fn with_log_level_text(self, text: &str) -> Self {
        match LogLevel::parse(text) {
            Some(level) => self.with_min_log_level(level),
            None => {
                tracing::warn!(
                    value = text,
                    "ignoring unrecognized --min-log-level override"
                );
                self
            }
        }
    }

    /// `true` when no field would replace anything.
    pub fn is_empty(&self) -> bool {
        self.plugin_path.is_none() && self.config_path.is_none() && self.min_log_level.is_none()
    }
}

fn non_empty(path: PathBuf) -> Option<PathBuf> {
    Some(path).filter(|p| !p.as_os_str().is_empty())
}

/// Applies `overrides` on top of `base`, field by field.
///
/// The function is pure and idempotent:
/// `resolve(&resolve(b, o), o) == resolve(b, o)`.
///
/// 将 `overrides` 逐字段应用到 `base` 之上。该函数是纯函数且幂等。
pub fn resolve(base: &RuntimeConfig, overrides: &Override) -> RuntimeConfig {
    let plugin_path = overrides
        .plugin_path
        .clone()
        .and_then(non_empty)
        .unwrap_or_else(|| base.plugin_path.clone());
    let config_path = overrides
        .config_path
        .clone()
        .and_then(non_empty)
        .unwrap_or_else(|| base.config_path.clone());
    let min_log_level = overrides
        .min_log_level
        .filter(LogLevel::is_defined)
        .unwrap_or(base.min_log_level);

    let resolved = RuntimeConfig {
        plugin_path,
        config_path,
        min_log_level,
    };
    tracing::debug!(
        plugin = %resolved.plugin_path.display(),
        config = %resolved.config_path.display(),
        level = %resolved.min_log_level,
        "resolved runtime configuration"
    );
    resolved
}

#[derive(Serialize)]
struct EffectiveSuite<'a> {
    runtime: &'a RuntimeConfig,
    #[serde(rename = "test")]
    tests: &'a [TestCase],
}

/// Renders the full effective configuration when its level is `TRACE`.
///
/// # Returns
/// `Ok(None)` for any other level, otherwise the dump text starting with
/// [`TRACE_DUMP_HEADER`].
pub fn trace_dump(runtime: &RuntimeConfig, tests: &[TestCase]) -> Result<Option<String>> {
    if runtime.min_log_level != LogLevel::Trace {
        return Ok(None);
    }
    let body = toml::to_string_pretty(&EffectiveSuite { runtime, tests })?;
    Ok(Some(format!("{TRACE_DUMP_HEADER}\n{body}")))
}
