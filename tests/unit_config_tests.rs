//! # Config Module Unit Tests / Config 模块单元测试
//!
//! Tests for suite documents: parsing in every supported format, test name
//! validation, log level parsing and path anchoring.
//!
//! 测试套件文档：各种支持格式的解析、测试名称校验、日志级别解析和路径锚定。

mod common;

use plugin_matrix_runner::core::config::{
    DocumentFormat, LogLevel, RuntimeConfig, TestCase, TestSuite, load_test_suite,
    validate_identifier,
};
use plugin_matrix_runner::core::error::SuiteError;
use std::path::{Path, PathBuf};

#[cfg(test)]
mod log_level_tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(LogLevel::parse("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("Warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse(" ERROR "), Some(LogLevel::Error));
    }

    #[test]
    fn test_parse_rejects_unknown_text() {
        assert_eq!(LogLevel::parse("verbose"), None);
        assert_eq!(LogLevel::parse(""), None);
    }

    #[test]
    fn test_undefined_is_the_default() {
        assert_eq!(LogLevel::default(), LogLevel::Undefined);
        assert!(!LogLevel::Undefined.is_defined());
        assert!(LogLevel::ALL.iter().filter(|l| l.is_defined()).count() == 5);
    }
}

#[cfg(test)]
mod identifier_tests {
    use super::*;

    #[test]
    fn test_accepts_plain_names() {
        assert!(validate_identifier("t1").is_ok());
        assert!(validate_identifier("handles empty input").is_ok());
        assert!(validate_identifier("utf-8 ✓").is_ok());
    }

    #[test]
    fn test_rejects_unsafe_names() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier(" padded").is_err());
        assert!(validate_identifier("a::b").is_err());
        assert!(validate_identifier("line\nbreak").is_err());
    }
}

#[cfg(test)]
mod parse_tests {
    use super::*;

    #[test]
    fn test_parse_toml_suite() {
        let text = r#"
[runtime]
plugin_path = "plugin.wasm"
config_path = "plugin.json"
min_log_level = "DEBUG"

[[test]]
name = "t1"
input = "hello"
args = ["--flag"]
timeout_secs = 3

[test.env]
MODE = "fast"

[test.expect]
exit_code = 0
stdout_contains = ["hello"]

[[test]]
name = "t2"
"#;
        let suite = TestSuite::parse_document(text, DocumentFormat::Toml).unwrap();

        assert_eq!(suite.runtime().plugin_path, PathBuf::from("plugin.wasm"));
        assert_eq!(suite.runtime().config_path, PathBuf::from("plugin.json"));
        assert_eq!(suite.runtime().min_log_level, LogLevel::Debug);

        let names: Vec<_> = suite.tests().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["t1", "t2"]);

        let first = &suite.tests()[0];
        assert_eq!(first.input.as_deref(), Some("hello"));
        assert_eq!(first.args, vec!["--flag"]);
        assert_eq!(first.timeout_secs, Some(3));
        assert_eq!(first.env.get("MODE").map(String::as_str), Some("fast"));
        assert_eq!(first.expect.stdout_contains, vec!["hello"]);
        assert_eq!(suite.tests()[1], TestCase::named("t2"));
    }

    #[test]
    fn test_parse_yaml_suite() {
        let text = r#"
runtime:
  plugin_path: plugin.wasm
  min_log_level: warn
test:
  - name: t1
    expect:
      exit_code: 2
"#;
        let suite = TestSuite::parse_document(text, DocumentFormat::Yaml).unwrap();
        assert_eq!(suite.runtime().min_log_level, LogLevel::Warn);
        assert_eq!(suite.tests()[0].expect.exit_code, 2);
    }

    #[test]
    fn test_parse_json_suite() {
        let text = r#"{
  "runtime": { "plugin_path": "plugin.wasm" },
  "test": [{ "name": "t1" }, { "name": "t2" }]
}"#;
        let suite = TestSuite::parse_document(text, DocumentFormat::Json).unwrap();
        assert_eq!(suite.tests().len(), 2);
        assert_eq!(suite.runtime().min_log_level, LogLevel::Undefined);
    }

    #[test]
    fn test_level_names_in_documents_ignore_case() {
        let json = r#"{
  "runtime": { "plugin_path": "p.wasm", "min_log_level": "Trace" },
  "test": [{ "name": "t" }]
}"#;
        let suite = TestSuite::parse_document(json, DocumentFormat::Json).unwrap();
        assert_eq!(suite.runtime().min_log_level, LogLevel::Trace);

        let toml = "[runtime]\nmin_log_level = \"Debug\"\n[[test]]\nname = \"t\"\n";
        let suite = TestSuite::parse_document(toml, DocumentFormat::Toml).unwrap();
        assert_eq!(suite.runtime().min_log_level, LogLevel::Debug);

        let yaml = "runtime:\n  min_log_level: wArN\ntest:\n  - name: t\n";
        let suite = TestSuite::parse_document(yaml, DocumentFormat::Yaml).unwrap();
        assert_eq!(suite.runtime().min_log_level, LogLevel::Warn);
    }

    #[test]
    fn test_unknown_level_in_document_is_a_parse_error() {
        let toml = "[runtime]\nmin_log_level = \"LOUD\"\n[[test]]\nname = \"t\"\n";
        let err = TestSuite::parse_document(toml, DocumentFormat::Toml).unwrap_err();
        assert!(matches!(err, SuiteError::Parse { .. }));
        assert!(err.to_string().contains("LOUD"), "{err}");
    }

    #[test]
    fn test_missing_runtime_uses_defaults() {
        let suite = TestSuite::parse_document("[[test]]\nname = \"only\"\n", DocumentFormat::Toml)
            .unwrap();
        assert_eq!(suite.runtime(), &RuntimeConfig::default());
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let err = TestSuite::parse_document("[[test]\nname = 1", DocumentFormat::Toml).unwrap_err();
        assert!(matches!(err, SuiteError::Parse { .. }));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let text = "[[test]]\nname = \"t1\"\nfeatures = \"x\"\n";
        let err = TestSuite::parse_document(text, DocumentFormat::Toml).unwrap_err();
        assert!(matches!(err, SuiteError::Parse { .. }));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let text = "[[test]]\nname = \"t1\"\n[[test]]\nname = \"t1\"\n";
        let err = TestSuite::parse_document(text, DocumentFormat::Toml).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("t1"));
    }

    #[test]
    fn test_unsafe_name_is_rejected() {
        let err = TestSuite::new(RuntimeConfig::default(), vec![TestCase::named("a::b")])
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("s.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("s.YML")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("s.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("s.toml")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("suite")), DocumentFormat::Toml);
    }
}

#[cfg(test)]
mod load_tests {
    use super::*;

    #[test]
    fn test_relative_paths_are_anchored_at_the_suite() {
        let temp_dir = common::setup_plugin_dir();
        let path = common::write_suite(
            &temp_dir,
            "suite.toml",
            "[runtime]\nplugin_path = \"plugin.sh\"\n\n[[test]]\nname = \"t1\"\n",
        );

        let suite = load_test_suite(&path).unwrap();
        assert_eq!(suite.runtime().plugin_path, temp_dir.path().join("plugin.sh"));
        assert!(suite.runtime().config_path.as_os_str().is_empty());
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let temp_dir = common::setup_plugin_dir();
        let plugin = temp_dir.path().join("elsewhere").join("p.wasm");
        let path = common::write_suite(
            &temp_dir,
            "suite.json",
            &format!(
                r#"{{"runtime": {{"plugin_path": {:?}}}, "test": [{{"name": "t1"}}]}}"#,
                plugin.display().to_string()
            ),
        );

        let suite = load_test_suite(&path).unwrap();
        assert_eq!(suite.runtime().plugin_path, plugin);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = load_test_suite(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, SuiteError::Read { .. }));
    }
}
