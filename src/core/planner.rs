//! # Planner Module / 计划模块
//!
//! Expands the engine x test matrix into execution units, engine-major, and
//! refuses to plan a run that has no plugin or no units.
//!
//! 将引擎 x 测试矩阵按引擎优先的顺序展开为执行单元，
//! 并拒绝为缺少插件或没有单元的运行制定计划。

use std::sync::Arc;

use crate::core::config::{RuntimeConfig, TestCase, TestSuite};
use crate::core::engine::{EngineId, EngineRegistry};
use crate::core::error::{SuiteError, SuiteResult};

/// Separator between the engine id and the test name in a unit id.
pub const UNIT_ID_SEPARATOR: &str = "::";

/// One (engine, test case) cell of the matrix, ready to be run once.
#[derive(Debug, Clone)]
pub struct ExecutionUnit {
    id: String,
    engine: EngineId,
    case: Arc<TestCase>,
    config: Arc<RuntimeConfig>,
}

impl ExecutionUnit {
    pub fn new(engine: EngineId, case: Arc<TestCase>, config: Arc<RuntimeConfig>) -> Self {
        Self {
            id: unit_id(&engine, &case.name),
            engine,
            case,
            config,
        }
    }

    /// `<engine>::<test>`, unique within a plan.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn engine(&self) -> &EngineId {
        &self.engine
    }

    pub fn case(&self) -> &TestCase {
        &self.case
    }

    /// The effective configuration, shared by every unit of the plan.
    pub fn config(&self) -> &Arc<RuntimeConfig> {
        &self.config
    }
}

/// Builds the identifier of the unit running `test_name` on `engine`.
pub fn unit_id(engine: &EngineId, test_name: &str) -> String {
    format!("{engine}{UNIT_ID_SEPARATOR}{test_name}")
}

/// Expands the full engine x test cross product, engine-major and test-minor.
///
/// The result always holds `engines.len() * tests.len()` units, in an order
/// that only depends on the order of the inputs.
pub fn expand(
    engines: &[EngineId],
    tests: &[TestCase],
    config: &Arc<RuntimeConfig>,
) -> Vec<ExecutionUnit> {
    let cases: Vec<Arc<TestCase>> = tests.iter().cloned().map(Arc::new).collect();

    let mut units = Vec::with_capacity(engines.len() * cases.len());
    for engine in engines {
        for case in &cases {
            units.push(ExecutionUnit::new(
                engine.clone(),
                Arc::clone(case),
                Arc::clone(config),
            ));
        }
    }
    units
}

#[derive(Debug)]
pub struct ExecutionPlan {
    pub units: Vec<ExecutionUnit>,
    pub engine_count: usize,
    pub test_count: usize,
}

impl ExecutionPlan {
    pub fn unit_ids(&self) -> Vec<&str> {
        self.units.iter().map(ExecutionUnit::id).collect()
    }
}

/// Expands `suite` over every engine of `registry` using the already
/// resolved `config`.
///
/// # Errors
/// - [`SuiteError::MissingPlugin`] when no plugin artifact is configured
/// - [`SuiteError::EmptyMatrix`] when either axis of the matrix is empty
pub fn plan_execution(
    registry: &EngineRegistry,
    suite: &TestSuite,
    config: Arc<RuntimeConfig>,
) -> SuiteResult<ExecutionPlan> {
    if config.plugin_path.as_os_str().is_empty() {
        return Err(SuiteError::MissingPlugin);
    }

    let engines = registry.list_engines();
    let units = expand(&engines, suite.tests(), &config);

    if units.is_empty() {
        return Err(SuiteError::EmptyMatrix {
            engines: engines.len(),
            tests: suite.tests().len(),
        });
    }

    tracing::debug!(
        engines = engines.len(),
        tests = suite.tests().len(),
        units = units.len(),
        "expanded test matrix"
    );

    Ok(ExecutionPlan {
        units,
        engine_count: engines.len(),
        test_count: suite.tests().len(),
    })
}
