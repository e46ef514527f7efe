//! # JSON Reporting Module / JSON 报告模块
//!
//! Machine-readable report of a run, one record per unit in run order.
//!
//! 一次运行的机器可读报告，按运行顺序每个单元一条记录。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::engine::EngineId;
use crate::core::models::{Outcome, ProcessResult, UnitResult};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    success: bool,
    total: usize,
    passed: usize,
    failed_units: &'a [String],
    units: Vec<JsonUnit<'a>>,
}

#[derive(Serialize)]
struct JsonUnit<'a> {
    id: &'a str,
    engine: &'a EngineId,
    test: &'a str,
    #[serde(flatten)]
    outcome: &'a Outcome,
    duration_secs: f64,
    output: &'a str,
}

/// Renders the report as pretty-printed JSON.
pub fn render_json_report(results: &[UnitResult], verdict: &ProcessResult) -> Result<String> {
    let units = results
        .iter()
        .map(|r| JsonUnit {
            id: &r.unit_id,
            engine: &r.engine,
            test: &r.case_name,
            outcome: &r.outcome,
            duration_secs: r.duration.as_secs_f64(),
            output: &r.output,
        })
        .collect();

    let report = JsonReport {
        generated_at: Utc::now(),
        success: verdict.is_success(),
        total: results.len(),
        passed: results.iter().filter(|r| !r.is_failure()).count(),
        failed_units: verdict.failed_units(),
        units,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Writes the JSON report to `output_path`.
pub fn generate_json_report(
    results: &[UnitResult],
    verdict: &ProcessResult,
    output_path: &Path,
) -> Result<()> {
    let json = render_json_report(results, verdict)?;
    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))
}
