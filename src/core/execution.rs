//! # Execution Driver Module / 执行驱动模块
//!
//! Runs every execution unit of a plan through a [`PluginRuntime`] and records
//! exactly one [`UnitResult`] per unit. Each unit runs in its own task, so an
//! error or a panic inside one unit becomes that unit's failed outcome and
//! never stops its siblings. There is no retry and no fast-fail.
//!
//! 通过 [`PluginRuntime`] 运行计划中的每个执行单元，并为每个单元恰好记录一个
//! [`UnitResult`]。每个单元在独立任务中运行，因此单元内部的错误或 panic
//! 只会成为该单元的失败结果，而不会中止其他单元。没有重试，也没有快速失败。

use anyhow::Result;
use colored::*;
use futures::future::BoxFuture;
use futures::{StreamExt, stream};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        models::{FailureReason, Outcome, RunReport, UnitResult},
        planner::ExecutionUnit,
    },
    infra::t,
};

/// The collaborator that actually loads a plugin on an engine, feeds it the
/// test's stimulus and checks the test's expectations.
///
/// Returning `Err` means the unit could not be run at all; the driver records
/// it as a [`FailureReason::RuntimeError`] for that unit only.
pub trait PluginRuntime: Send + Sync {
    fn invoke<'a>(&'a self, unit: &'a ExecutionUnit) -> BoxFuture<'a, Result<RunReport>>;
}

/// Default number of units run concurrently.
pub fn default_jobs() -> usize {
    num_cpus::get() / 2 + 1
}

/// Runs all `units`, at most `jobs` at a time, and returns their results in
/// unit order.
///
/// # Arguments
/// * `units` - The expanded matrix, consumed exactly once
/// * `runtime` - The plugin runtime shared by every unit
/// * `jobs` - Maximum number of units in flight (values below 1 mean 1)
/// * `stop_token` - Cancels outstanding units, which then report `Cancelled`
pub async fn run_units(
    units: Vec<ExecutionUnit>,
    runtime: Arc<dyn PluginRuntime>,
    jobs: usize,
    stop_token: CancellationToken,
) -> Vec<UnitResult> {
    stream::iter(units.into_iter().map(|unit| {
        let runtime = Arc::clone(&runtime);
        let stop_token = stop_token.clone();
        run_unit(unit, runtime, stop_token)
    }))
    .buffered(jobs.max(1))
    .collect()
    .await
}

/// Runs a single unit in its own task and turns whatever happens into a
/// [`UnitResult`].
pub async fn run_unit(
    unit: ExecutionUnit,
    runtime: Arc<dyn PluginRuntime>,
    stop_token: CancellationToken,
) -> UnitResult {
    let unit_id = unit.id().to_string();
    let engine = unit.engine().clone();
    let case_name = unit.case().name.clone();
    let start_time = Instant::now();

    let report = if stop_token.is_cancelled() {
        cancelled_report()
    } else {
        tracing::debug!(unit = %unit_id, "dispatching unit");
        println!("{}", t!("run.running_unit", name = &unit_id).blue());

        let mut handle = tokio::spawn(async move { runtime.invoke(&unit).await });

        tokio::select! {
            biased;
            _ = stop_token.cancelled() => {
                handle.abort();
                cancelled_report()
            }
            joined = &mut handle => match joined {
                Ok(Ok(report)) => report,
                Ok(Err(e)) => RunReport::failed(
                    FailureReason::RuntimeError,
                    format!("{e:#}"),
                    String::new(),
                ),
                Err(e) if e.is_panic() => RunReport::failed(
                    FailureReason::Panicked,
                    panic_message(e.into_panic()),
                    String::new(),
                ),
                Err(e) => RunReport::failed(
                    FailureReason::Cancelled,
                    e.to_string(),
                    String::new(),
                ),
            },
        }
    };

    let duration = start_time.elapsed();
    let secs = format!("{:.2}", duration.as_secs_f64());
    match &report.outcome {
        Outcome::Passed => println!(
            "{}",
            t!("run.unit_passed", name = &unit_id, duration = &secs).green()
        ),
        Outcome::Failed { message, .. } => {
            tracing::debug!(unit = %unit_id, %message, "unit failed");
            println!(
                "{}",
                t!("run.unit_failed", name = &unit_id, duration = &secs).red()
            )
        }
    }

    UnitResult {
        unit_id,
        engine,
        case_name,
        outcome: report.outcome,
        output: report.output,
        duration,
    }
}

fn cancelled_report() -> RunReport {
    RunReport::failed(
        FailureReason::Cancelled,
        t!("run.unit_cancelled").to_string(),
        String::new(),
    )
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}
