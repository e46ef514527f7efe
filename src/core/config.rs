//! # Suite Model / 测试套件模型
//!
//! In-memory form of a suite document: the runtime settings shared by every
//! test plus the ordered list of test cases. Construction always validates,
//! so a `TestSuite` value that exists is a valid one.
//!
//! 测试套件文档的内存表示：所有测试共享的运行时设置以及有序的测试用例列表。
//! 构造时总会进行校验，因此存在的 `TestSuite` 值一定是有效的。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::error::{SuiteError, SuiteResult};
use crate::infra::fs;

/// Minimum severity a plugin should log at.
/// `Undefined` is the "unset" sentinel and sorts below every real level.
///
/// 插件日志的最低严重级别。
/// `Undefined` 是表示 "未设置" 的哨兵值，排序低于所有真实级别。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[default]
    Undefined,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Every member, sentinel first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Undefined,
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Parses a level name, ignoring ASCII case and surrounding whitespace.
    /// Unrecognized text yields `None`; it is never mapped to a nearby level.
    ///
    /// 解析级别名称，忽略 ASCII 大小写和首尾空白。
    /// 无法识别的文本返回 `None`，绝不会被映射为相近的级别。
    pub fn parse(text: &str) -> Option<LogLevel> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(text))
    }

    /// The canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Undefined => "UNDEFINED",
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// `false` only for the `Undefined` sentinel.
    pub fn is_defined(&self) -> bool {
        *self != LogLevel::Undefined
    }
}

/// Suite documents accept level names in any case, the same way the
/// command line does.
impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        const NAMES: &[&str] = &["UNDEFINED", "TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
        let text = String::deserialize(deserializer)?;
        LogLevel::parse(&text).ok_or_else(|| serde::de::Error::unknown_variant(&text, NAMES))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by every test case of a suite.
/// 测试套件中所有测试用例共享的设置。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Path to the plugin artifact. Empty means "not configured".
    /// 插件产物的路径。为空表示 "未配置"。
    #[serde(default)]
    pub plugin_path: PathBuf,
    /// Path to the plugin configuration. Empty means "no configuration".
    /// 插件配置的路径。为空表示 "无配置"。
    #[serde(default)]
    pub config_path: PathBuf,
    /// Minimum log severity handed to the plugin.
    /// 传递给插件的最低日志级别。
    #[serde(default)]
    pub min_log_level: LogLevel,
}

impl RuntimeConfig {
    /// Anchors relative, non-empty paths at `base_dir` after expanding `~` and
    /// environment variables.
    fn anchor_paths(&mut self, base_dir: &Path) -> SuiteResult<()> {
        for (field, path) in [
            ("runtime.plugin_path", &mut self.plugin_path),
            ("runtime.config_path", &mut self.config_path),
        ] {
            if path.as_os_str().is_empty() {
                continue;
            }
            let expanded = fs::expand_path(path)
                .map_err(|e| SuiteError::validation(format!("{field}: {e}")))?;
            *path = fs::anchor_path(base_dir, &expanded);
        }
        Ok(())
    }
}

/// Observable behavior a test case expects from the plugin run.
/// 测试用例期望插件运行表现出的可观察行为。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectations {
    /// Expected exit code of the engine process. Defaults to `0`.
    #[serde(default)]
    pub exit_code: i32,
    /// Substrings that must all appear on stdout.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stdout_contains: Vec<String>,
    /// Substrings that must not appear on stdout.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stdout_not_contains: Vec<String>,
    /// Substrings that must all appear on stderr.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stderr_contains: Vec<String>,
}

/// One named scenario of a suite.
/// Everything except `name` is stimulus or expectation data that only the
/// plugin runtime interprets.
///
/// 测试套件中的一个命名场景。
/// 除 `name` 之外的字段都是仅由插件运行时解释的激励或期望数据。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    /// Unique, identifier-safe name used in reports and unit ids.
    /// 唯一且可安全嵌入标识符的名称，用于报告和单元 ID。
    pub name: String,
    /// Free-form description shown in reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Text written to the plugin's stdin.
    /// 写入插件 stdin 的文本。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Extra arguments appended to the engine command line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Extra environment variables for the engine process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Optional timeout in seconds for a single run of this test.
    /// 单次运行此测试的可选超时时间（秒）。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Expectations checked against the captured run.
    /// 针对捕获结果进行检查的期望。
    #[serde(default)]
    pub expect: Expectations,
}

impl TestCase {
    /// Creates a test case with the given name and default stimulus.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A validated suite: runtime settings plus ordered test cases.
/// 经过校验的测试套件：运行时设置加有序的测试用例。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestSuite {
    #[serde(default)]
    runtime: RuntimeConfig,
    #[serde(default, rename = "test")]
    tests: Vec<TestCase>,
}

impl TestSuite {
    /// Builds a suite from parts, validating every test name.
    pub fn new(runtime: RuntimeConfig, tests: Vec<TestCase>) -> SuiteResult<Self> {
        let suite = Self { runtime, tests };
        suite.validate()?;
        Ok(suite)
    }

    /// Parses and validates a suite document.
    ///
    /// # Errors
    /// - [`SuiteError::Parse`] when `text` is not a well-formed document of `format`
    /// - [`SuiteError::Validation`] when a test name is empty, duplicated or unsafe
    pub fn parse_document(text: &str, format: DocumentFormat) -> SuiteResult<Self> {
        let suite: TestSuite = match format {
            DocumentFormat::Toml => toml::from_str(text).map_err(|e| format.parse_error(e))?,
            DocumentFormat::Yaml => {
                serde_yaml::from_str(text).map_err(|e| format.parse_error(e))?
            }
            DocumentFormat::Json => {
                serde_json::from_str(text).map_err(|e| format.parse_error(e))?
            }
        };
        suite.validate()?;
        Ok(suite)
    }

    /// The suite-level runtime settings.
    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    /// The test cases, in document order.
    pub fn tests(&self) -> &[TestCase] {
        &self.tests
    }

    fn validate(&self) -> SuiteResult<()> {
        let mut seen = HashSet::with_capacity(self.tests.len());
        for (index, case) in self.tests.iter().enumerate() {
            validate_identifier(&case.name).map_err(|reason| {
                SuiteError::validation(format!("test #{} {reason}", index + 1))
            })?;
            if !seen.insert(case.name.as_str()) {
                return Err(SuiteError::validation(format!(
                    "duplicate test name '{}'",
                    case.name
                )));
            }
        }
        Ok(())
    }
}

/// Checks that `name` can be embedded in a unit id of the form
/// `<engine>::<test>` without ambiguity.
pub fn validate_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("has an empty name".to_string());
    }
    if name.trim() != name {
        return Err(format!("name '{name}' has leading or trailing whitespace"));
    }
    if name.contains("::") {
        return Err(format!("name '{name}' must not contain '::'"));
    }
    if name.chars().any(char::is_control) {
        return Err(format!("name '{}' contains control characters", name.escape_debug()));
    }
    Ok(())
}

/// Serialization formats accepted for suite documents.
/// 测试套件文档可接受的序列化格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from the file extension; anything unknown is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }

    fn parse_error(self, error: impl fmt::Display) -> SuiteError {
        SuiteError::Parse {
            format: self.to_string(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentFormat::Toml => "TOML",
            DocumentFormat::Yaml => "YAML",
            DocumentFormat::Json => "JSON",
        })
    }
}

/// Reads, parses and validates the suite document at `path`.
/// Relative runtime paths are anchored at the document's directory.
///
/// 读取、解析并校验位于 `path` 的测试套件文档。
/// 相对的运行时路径以文档所在目录为基准。
pub fn load_test_suite(path: &Path) -> SuiteResult<TestSuite> {
    let text = fs::read_document(path)?;
    let mut suite = TestSuite::parse_document(&text, DocumentFormat::from_path(path))?;
    let base_dir = path.parent().unwrap_or(Path::new("."));
    suite.runtime.anchor_paths(base_dir)?;
    Ok(suite)
}
