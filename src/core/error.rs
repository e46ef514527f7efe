//! # Setup Errors / 准备阶段错误
//!
//! Everything that can go wrong before the first unit runs. All variants are
//! fatal and map to the "setup failed" exit code; a failing unit is never an
//! error, it is an [`Outcome`](crate::core::models::Outcome).
//!
//! 第一个执行单元运行之前可能出现的所有错误。所有变体都是致命的，
//! 并映射到 "准备失败" 退出码；失败的单元从不是错误，而是一个 `Outcome`。

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for suite loading and planning.
pub type SuiteResult<T> = std::result::Result<T, SuiteError>;

/// Errors raised while loading, validating or expanding a suite.
/// 加载、校验或展开测试套件时产生的错误。
#[derive(Error, Debug)]
pub enum SuiteError {
    // === Loading ===
    #[error("Failed to read suite document '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse suite document as {format}: {message}")]
    Parse { format: String, message: String },

    #[error("No plugin artifact configured. Set `runtime.plugin_path` in the suite or pass --plugin")]
    MissingPlugin,

    // === Validation ===
    #[error("Invalid test suite: {0}")]
    Validation(String),

    // === Engine registry ===
    #[error("Invalid engine definition '{spec}': {reason}")]
    InvalidEngine { spec: String, reason: String },

    #[error("Engine '{0}' is registered more than once")]
    DuplicateEngine(String),

    #[error("No execution engines available. Install one of [{searched}] or pass --engine <ID=COMMAND>")]
    NoEngines { searched: String },

    // === Planning ===
    #[error("The test matrix is empty ({engines} engine(s) x {tests} test(s)); refusing to report a vacuous success")]
    EmptyMatrix { engines: usize, tests: usize },
}

impl SuiteError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid engine error
    pub fn invalid_engine(spec: &str, reason: &str) -> Self {
        Self::InvalidEngine {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is a validation failure rather than a configuration failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, SuiteError::Validation(_))
    }
}
