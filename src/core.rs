//! # Core Module / 核心模块
//!
//! The orchestration pipeline: the suite model, override resolution, the
//! engine registry, matrix expansion, the execution driver and the result
//! reducer.
//!
//! 编排管道：测试套件模型、覆盖解析、引擎注册表、矩阵展开、执行驱动和结果归约。

pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod models;
pub mod overrides;
pub mod planner;

// Re-exports
pub use config::TestSuite;
pub use error::SuiteError;
pub use execution::{PluginRuntime, run_units};
pub use models::{ProcessResult, UnitResult, reduce};
pub use overrides::{Override, resolve};
pub use planner::{ExecutionUnit, expand};
