//! # HTML Reporting Module / HTML 报告模块
//!
//! This module renders a self-contained HTML report of a run: summary
//! counters, the verdict, and one row per unit with its failure details
//! folded under a `<details>` element.
//!
//! 此模块渲染一次运行的独立 HTML 报告：汇总计数、裁决，
//! 以及每个单元一行，失败详情折叠在 `<details>` 元素中。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{Outcome, ProcessResult, UnitResult};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", Roboto, sans-serif; margin: 2rem; color: #222; }
h1 { font-size: 1.6rem; }
.summary-container { display: flex; gap: 1rem; margin-bottom: 1.5rem; }
.summary-item { border: 1px solid #ddd; border-radius: 6px; padding: 0.8rem 1.2rem; text-align: center; }
.summary-item .count { display: block; font-size: 1.6rem; font-weight: bold; }
.passed-text { color: #1a7f37; }
.failed-text { color: #cf222e; }
.verdict { font-weight: bold; margin-bottom: 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #eee; padding: 0.4rem 0.6rem; text-align: left; vertical-align: top; }
.duration-cell { text-align: right; white-space: nowrap; }
.status-passed { color: #1a7f37; }
.status-failed { color: #cf222e; }
.status-timeout { color: #9a6700; }
pre.output-content { background: #f6f8fa; padding: 0.6rem; overflow-x: auto; }
"#;

/// Renders the report markup.
///
/// # Arguments / 参数
/// * `results` - Unit results in run order / 按运行顺序排列的单元结果
/// * `verdict` - The reduced verdict of the run / 运行的归约裁决
/// * `locale` - The locale to use for internationalization / 用于国际化的语言环境
pub fn render_html_report(results: &[UnitResult], verdict: &ProcessResult, locale: &str) -> Markup {
    let title = t!("html_report.title", locale = locale).to_string();
    let total = results.len();
    let failed = results.iter().filter(|r| r.is_failure()).count();
    let passed = total - failed;
    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let ok = verdict.is_success();
    let verdict_text = if ok {
        t!("html_report.verdict_success", locale = locale).to_string()
    } else {
        t!("html_report.verdict_failure", locale = locale).to_string()
    };

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (title) }
                p { (t!("html_report.generated_at", locale = locale, time = &generated_at).to_string()) }
                div class="summary-container" {
                    div class="summary-item" {
                        span class="count" { (total) }
                        span class="label" { (t!("html_report.summary.total", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count passed-text" { (passed) }
                        span class="label" { (t!("html_report.summary.passed", locale = locale).to_string()) }
                    }
                    div class="summary-item" {
                        span class="count failed-text" { (failed) }
                        span class="label" { (t!("html_report.summary.failed", locale = locale).to_string()) }
                    }
                }
                p.verdict.passed-text[ok].failed-text[!ok] { (verdict_text) }
                table {
                    thead {
                        tr {
                            th { (t!("html_report.table.unit", locale = locale).to_string()) }
                            th { (t!("html_report.table.status", locale = locale).to_string()) }
                            th class="duration-cell" { (t!("html_report.table.duration", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @for result in results {
                            (render_row(result, locale))
                        }
                    }
                }
            }
        }
    }
}

fn render_row(result: &UnitResult, locale: &str) -> Markup {
    html! {
        tr {
            td { (result.unit_id) }
            td {
                span class=(result.get_status_class()) { (result.get_status_str(locale)) }
                @if let Outcome::Failed { reason, message } = &result.outcome {
                    details {
                        summary { (reason.label(locale)) ": " (message) }
                        pre class="output-content" { (result.output) }
                    }
                }
            }
            td class="duration-cell" { (format!("{:.2}s", result.duration.as_secs_f64())) }
        }
    }
}

/// Generates the HTML report and writes it to `output_path`.
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
/// 如果无法写入文件则返回错误。
pub fn generate_html_report(
    results: &[UnitResult],
    verdict: &ProcessResult,
    output_path: &Path,
    locale: &str,
) -> Result<()> {
    let markup = render_html_report(results, verdict, locale);
    fs::write(output_path, markup.into_string())
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))
}
