//! # Override Resolver Unit Tests / 覆盖解析器单元测试
//!
//! 测试覆盖项的优先级、软覆盖语义、幂等性以及 TRACE 配置转储。

mod common;

use plugin_matrix_runner::core::config::{LogLevel, RuntimeConfig, TestCase};
use plugin_matrix_runner::core::overrides::{Override, TRACE_DUMP_HEADER, resolve, trace_dump};
use std::path::PathBuf;

fn base() -> RuntimeConfig {
    RuntimeConfig {
        plugin_path: PathBuf::from("/plugins/base.wasm"),
        config_path: PathBuf::from("/plugins/base.json"),
        min_log_level: LogLevel::Warn,
    }
}

#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[test]
    fn test_empty_override_keeps_base() {
        let overrides = Override::new();
        assert!(overrides.is_empty());
        assert_eq!(resolve(&base(), &overrides), base());
    }

    #[test]
    fn test_present_fields_win() {
        let overrides = Override::new()
            .with_plugin_path("/tmp/other.wasm")
            .with_min_log_level(LogLevel::Trace);

        let resolved = resolve(&base(), &overrides);
        assert_eq!(resolved.plugin_path, PathBuf::from("/tmp/other.wasm"));
        assert_eq!(resolved.config_path, base().config_path);
        assert_eq!(resolved.min_log_level, LogLevel::Trace);
    }

    #[test]
    fn test_precedence_examples() {
        let suite = common::runtime_config("/a/plugin.bin", LogLevel::Info);

        let kept = resolve(&suite, &Override::new().with_min_log_level(LogLevel::Undefined));
        assert_eq!(kept.min_log_level, LogLevel::Info);

        let replaced = resolve(&suite, &Override::new().with_plugin_path("/b/plugin.bin"));
        assert_eq!(replaced.plugin_path, PathBuf::from("/b/plugin.bin"));
    }

    #[test]
    fn test_override_fills_missing_plugin() {
        let suite = common::runtime_config("", LogLevel::Undefined);
        let resolved = resolve(&suite, &Override::new().with_plugin_path("p.wasm"));
        assert_eq!(resolved.plugin_path, PathBuf::from("p.wasm"));
        assert_eq!(resolved.min_log_level, LogLevel::Undefined);
    }

    #[test]
    fn test_undefined_level_is_absent() {
        let overrides = Override::new().with_min_log_level(LogLevel::Undefined);
        assert!(overrides.is_empty());
        assert_eq!(resolve(&base(), &overrides).min_log_level, LogLevel::Warn);
    }

    #[test]
    fn test_undefined_level_in_a_literal_override_is_absent() {
        let overrides = Override {
            plugin_path: Some(PathBuf::new()),
            config_path: None,
            min_log_level: Some(LogLevel::Undefined),
        };
        assert_eq!(resolve(&base(), &overrides), base());
    }

    #[test]
    fn test_unknown_level_text_is_ignored() {
        let overrides = Override::new().with_log_level_text("LOUD");
        assert!(overrides.min_log_level.is_none());

        let overrides = Override::new().with_log_level_text("debug");
        assert_eq!(overrides.min_log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_empty_paths_are_absent() {
        let overrides = Override::new().with_plugin_path("").with_config_path("");
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let cases = [
            Override::new(),
            Override::new().with_plugin_path("/x.wasm"),
            Override::new()
                .with_config_path("/c.json")
                .with_min_log_level(LogLevel::Error),
        ];
        for overrides in &cases {
            let once = resolve(&base(), overrides);
            let twice = resolve(&once, overrides);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_resolve_does_not_touch_base() {
        let suite = base();
        let _ = resolve(&suite, &Override::new().with_plugin_path("/x.wasm"));
        assert_eq!(suite, base());
    }
}

#[cfg(test)]
mod trace_dump_tests {
    use super::*;

    #[test]
    fn test_no_dump_below_trace() {
        for level in LogLevel::ALL.into_iter().filter(|l| *l != LogLevel::Trace) {
            let config = common::runtime_config("p.wasm", level);
            assert!(trace_dump(&config, &[]).unwrap().is_none());
        }
    }

    #[test]
    fn test_dump_contains_effective_values() {
        let config = common::runtime_config("/plugins/p.wasm", LogLevel::Trace);
        let tests = vec![TestCase::named("t1"), TestCase::named("t2")];

        let dump = trace_dump(&config, &tests).unwrap().unwrap();
        assert!(dump.starts_with(TRACE_DUMP_HEADER));
        assert!(dump.contains("/plugins/p.wasm"));
        assert!(dump.contains("TRACE"));
        assert!(dump.contains("t1"));
        assert!(dump.contains("t2"));
    }
}
