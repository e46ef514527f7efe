//! # Reporting Module / 报告模块
//!
//! This module handles the generation and display of run reports in multiple formats.
//! It prints colourful summaries to the console and writes HTML and JSON
//! report files, with internationalization support.
//!
//! 此模块处理多种格式的运行报告生成和显示。
//! 它在控制台打印彩色摘要，并写出 HTML 和 JSON 报告文件，支持国际化。

pub mod console;
pub mod html;
pub mod json;

// Re-export common reporting functions
pub use console::{print_failure_details, print_summary, print_verdict};
pub use html::generate_html_report;
pub use json::generate_json_report;
