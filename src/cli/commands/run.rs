//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command, which loads a suite, applies the
//! command-line overrides, expands the engine x test matrix and drives every
//! unit to a verdict.
//!
//! 此模块实现 `run` 命令：加载测试套件，应用命令行覆盖，
//! 展开引擎 x 测试矩阵，并将每个单元运行至得出裁决。

use anyhow::{Context, Result};
use colored::*;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::{self, RuntimeConfig, TestSuite},
        engine::{EngineRegistry, EngineSpec},
        execution::{self, PluginRuntime},
        models::{self, UnitResult},
        overrides::{self, Override},
        planner::{self, ExecutionPlan},
    },
    infra::{runtime::ProcessRuntime, t},
    reporting::{
        generate_html_report, generate_json_report, print_failure_details, print_summary,
        print_verdict,
    },
};

/// Options of the `run` command, as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub suite: PathBuf,
    pub overrides: Override,
    /// Explicit `ID=COMMAND` engine definitions. Empty means discovery.
    pub engines: Vec<String>,
    pub jobs: Option<usize>,
    pub html: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Everything needed to run a suite, produced before any unit starts.
pub struct PreparedRun {
    pub suite: TestSuite,
    pub config: Arc<RuntimeConfig>,
    pub registry: EngineRegistry,
    pub plan: ExecutionPlan,
}

/// Builds the engine registry from explicit definitions, or discovers the
/// installed engines when none are given.
pub fn build_registry(definitions: &[String]) -> Result<EngineRegistry> {
    if definitions.is_empty() {
        return Ok(EngineRegistry::discover());
    }
    let specs = definitions
        .iter()
        .map(|definition| EngineSpec::parse(definition))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EngineRegistry::from_specs(specs)?)
}

/// Loads the suite, resolves the effective configuration and plans the
/// matrix. Nothing is executed.
///
/// The effective configuration is dumped to stdout when its log level is
/// `TRACE`.
pub fn prepare(
    suite_path: &Path,
    overrides: &Override,
    engine_definitions: &[String],
    locale: &str,
) -> Result<PreparedRun> {
    println!(
        "{}",
        t!("run.loading_suite", locale = locale, path = suite_path.display())
    );
    let suite = config::load_test_suite(suite_path)
        .with_context(|| {
            t!("run.suite_load_failed", locale = locale, path = suite_path.display()).to_string()
        })?;

    let config = Arc::new(overrides::resolve(suite.runtime(), overrides));
    if let Some(dump) = overrides::trace_dump(&config, suite.tests())? {
        println!("{dump}");
    }

    let registry = build_registry(engine_definitions)?;
    registry.ensure_not_empty()?;
    let engine_names: Vec<String> = registry
        .list_engines()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!(
        "{}",
        t!("run.engines_selected", locale = locale, engines = engine_names.join(", ")).cyan()
    );

    let plan = planner::plan_execution(&registry, &suite, Arc::clone(&config))?;
    println!(
        "{}",
        t!(
            "run.matrix_expanded",
            locale = locale,
            engines = plan.engine_count,
            tests = plan.test_count,
            units = plan.units.len()
        )
        .bold()
    );

    Ok(PreparedRun {
        suite,
        config,
        registry,
        plan,
    })
}

/// Executes the run command with the provided options.
///
/// # Returns
/// The exit code of the run: `0` when every unit passed, `1` otherwise.
/// Loading, resolution and planning problems are returned as errors.
pub async fn execute(options: RunOptions, locale: &str) -> Result<u8> {
    let PreparedRun { registry, plan, .. } =
        prepare(&options.suite, &options.overrides, &options.engines, locale)?;

    let stop_token = setup_signal_handler(locale);
    let runtime: Arc<dyn PluginRuntime> = Arc::new(ProcessRuntime::new(registry));
    let jobs = options.jobs.unwrap_or_else(execution::default_jobs);

    let results = execution::run_units(plan.units, runtime, jobs, stop_token).await;
    let verdict = models::reduce(&results);

    print_summary(&results, locale);

    let failures: Vec<&UnitResult> = results.iter().filter(|r| r.is_failure()).collect();
    print_failure_details(&failures, locale);

    if let Some(report_path) = &options.html {
        println!(
            "\n{}",
            t!("run.writing_html", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&results, &verdict, report_path, locale) {
            eprintln!("{} {e:#}", t!("run.report_failed", locale = locale).red());
        }
    }
    if let Some(report_path) = &options.json {
        println!(
            "\n{}",
            t!("run.writing_json", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_json_report(&results, &verdict, report_path) {
            eprintln!("{} {e:#}", t!("run.report_failed", locale = locale).red());
        }
    }

    print_verdict(&verdict, locale);
    Ok(verdict.exit_code())
}

/// Sets up a signal handler for graceful shutdown.
fn setup_signal_handler(locale: &str) -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
                token_clone.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "failed to listen for Ctrl-C"),
        }
    });

    token
}
