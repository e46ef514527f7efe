//! # Matrix Expander Unit Tests / 矩阵展开单元测试

mod common;

use plugin_matrix_runner::core::config::{LogLevel, RuntimeConfig, TestSuite};
use plugin_matrix_runner::core::engine::{EngineId, EngineRegistry, EngineSpec};
use plugin_matrix_runner::core::error::SuiteError;
use plugin_matrix_runner::core::planner::{expand, plan_execution, unit_id};
use std::collections::HashSet;
use std::sync::Arc;

fn engines(ids: &[&str]) -> Vec<EngineId> {
    ids.iter().map(|id| EngineId::new(*id).unwrap()).collect()
}

fn registry(ids: &[&str]) -> EngineRegistry {
    EngineRegistry::from_specs(
        ids.iter()
            .map(|id| EngineSpec::new(id, "sh {plugin}").unwrap())
            .collect(),
    )
    .unwrap()
}

#[cfg(test)]
mod expand_tests {
    use super::*;

    #[test]
    fn test_cross_product_is_complete_and_ordered() {
        let config = Arc::new(common::runtime_config("p.wasm", LogLevel::Info));
        let units = expand(
            &engines(&["e1", "e2"]),
            &common::test_cases(&["a", "b", "c"]),
            &config,
        );

        let ids: Vec<&str> = units.iter().map(|u| u.id()).collect();
        assert_eq!(
            ids,
            vec!["e1::a", "e1::b", "e1::c", "e2::a", "e2::b", "e2::c"]
        );
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn test_units_share_the_effective_config() {
        let config = Arc::new(common::runtime_config("p.wasm", LogLevel::Error));
        let units = expand(&engines(&["e1", "e2"]), &common::test_cases(&["a"]), &config);
        for unit in &units {
            assert!(Arc::ptr_eq(unit.config(), &config));
        }
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let config = Arc::new(RuntimeConfig::default());
        let tests = common::test_cases(&["x", "y"]);
        let first: Vec<String> = expand(&engines(&["a", "b"]), &tests, &config)
            .iter()
            .map(|u| u.id().to_string())
            .collect();
        let second: Vec<String> = expand(&engines(&["a", "b"]), &tests, &config)
            .iter()
            .map(|u| u.id().to_string())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_axis_gives_no_units() {
        let config = Arc::new(RuntimeConfig::default());
        assert!(expand(&[], &common::test_cases(&["a"]), &config).is_empty());
        assert!(expand(&engines(&["e"]), &[], &config).is_empty());
    }

    #[test]
    fn test_unit_id_format() {
        let engine = EngineId::new("wasmtime").unwrap();
        assert_eq!(unit_id(&engine, "reads stdin"), "wasmtime::reads stdin");
    }
}

#[cfg(test)]
mod plan_tests {
    use super::*;

    #[test]
    fn test_plan_counts() {
        let suite = TestSuite::new(
            common::runtime_config("p.wasm", LogLevel::Undefined),
            common::test_cases(&["t1", "t2", "t3"]),
        )
        .unwrap();
        let config = Arc::new(suite.runtime().clone());

        let plan = plan_execution(&registry(&["e1", "e2"]), &suite, config).unwrap();
        assert_eq!(plan.engine_count, 2);
        assert_eq!(plan.test_count, 3);
        assert_eq!(plan.units.len(), 6);
        assert_eq!(plan.unit_ids()[0], "e1::t1");
    }

    #[test]
    fn test_missing_plugin_is_reported() {
        let suite =
            TestSuite::new(RuntimeConfig::default(), common::test_cases(&["t1"])).unwrap();
        let err = plan_execution(&registry(&["e1"]), &suite, Arc::new(RuntimeConfig::default()))
            .unwrap_err();
        assert!(matches!(err, SuiteError::MissingPlugin));
    }

    #[test]
    fn test_empty_suite_is_an_empty_matrix() {
        let config = common::runtime_config("p.wasm", LogLevel::Undefined);
        let suite = TestSuite::new(config.clone(), Vec::new()).unwrap();
        let err = plan_execution(&registry(&["e1"]), &suite, Arc::new(config)).unwrap_err();
        assert!(matches!(err, SuiteError::EmptyMatrix { engines: 1, tests: 0 }));
    }

    #[test]
    fn test_empty_registry_is_an_empty_matrix() {
        let config = common::runtime_config("p.wasm", LogLevel::Undefined);
        let suite = TestSuite::new(config.clone(), common::test_cases(&["t1"])).unwrap();
        let err = plan_execution(&EngineRegistry::default(), &suite, Arc::new(config))
            .unwrap_err();
        assert!(matches!(err, SuiteError::EmptyMatrix { engines: 0, tests: 1 }));
    }
}
