//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the run summary, the details of every failed unit and
//! the final verdict, with colour coding and internationalization support.
//!
//! 此模块打印运行摘要、每个失败单元的详细信息以及最终裁决，
//! 支持颜色编码和国际化。

use colored::*;

use crate::core::models::{Outcome, ProcessResult, UnitResult};
use crate::infra::t;

/// Prints a formatted summary of unit results to the console, in run order.
///
/// 在控制台按运行顺序打印格式化的单元结果摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Matrix Summary ---
///   - Status     | Unit                                              |   Duration
///   - Passed     | wasmtime::basic                                   |      0.12s
///   - Failed     | wasmtime::rejects-bad-header                      |      0.09s
/// ```
pub fn print_summary(results: &[UnitResult], locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in results {
        let status_str = result.get_status_str(locale);
        let status_colored = match &result.outcome {
            Outcome::Passed => status_str.green(),
            Outcome::Failed { .. } => status_str.red(),
        };
        let duration_str = format!("{:.2}s", result.duration.as_secs_f64());

        println!(
            "  - {:<10} | {:<50} | {:>10}",
            status_colored, result.unit_id, duration_str
        );
    }
}

/// Prints the reason, message and captured output of each failed unit.
///
/// 打印每个失败单元的原因、消息和捕获的输出。
pub fn print_failure_details(failures: &[&UnitResult], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!("\n{}", t!("report.failure_banner", locale = locale).red().bold());
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            t!("report.header_failure", locale = locale).red(),
            result.unit_id.cyan()
        );

        if let Outcome::Failed { reason, message } = &result.outcome {
            println!("  {}: {}", reason.label(locale).yellow(), message);
        }
        if !result.output.trim().is_empty() {
            println!("\n--- {} ---\n", t!("report.unit_log", locale = locale).yellow());
            println!("{}", result.output.trim_end());
        }
        println!("\n{}", "-".repeat(80));
    }
}

/// Prints the single verdict of the run.
pub fn print_verdict(verdict: &ProcessResult, locale: &str) {
    match verdict {
        ProcessResult::Success { passed } => println!(
            "\n{}",
            t!("report.all_passed", locale = locale, count = passed)
                .green()
                .bold()
        ),
        ProcessResult::Failure { failed, total } => {
            println!(
                "\n{}",
                t!(
                    "report.some_failed",
                    locale = locale,
                    failed = failed.len(),
                    total = total
                )
                .red()
                .bold()
            );
            for unit_id in failed {
                println!("  - {}", unit_id.red());
            }
        }
    }
}
