//! # Plugin Matrix Runner Library / 插件矩阵运行器库
//!
//! This library drives declarative plugin test suites across every available
//! runtime engine. A suite names a plugin artifact and a list of test cases;
//! the runner resolves overrides, expands the engine x test matrix, runs each
//! unit in isolation and reduces the outcomes to one verdict.
//!
//! 此库在所有可用的运行时引擎上驱动声明式插件测试套件。套件指定一个插件产物
//! 和一组测试用例；运行器解析覆盖项，展开引擎 x 测试矩阵，隔离运行每个单元，
//! 并将结果归约为一个裁决。
//!
//! ## Modules / 模块
//!
//! - `core` - Suite model, overrides, engines, planning and execution
//! - `infra` - Process spawning, file system helpers and logging
//! - `reporting` - Console, HTML and JSON reports
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 套件模型、覆盖、引擎、计划与执行
//! - `infra` - 进程启动、文件系统辅助与日志
//! - `reporting` - 控制台、HTML 与 JSON 报告
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::config;
pub use core::execution;
pub use core::models;
pub use core::{ProcessResult, SuiteError, TestSuite};

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
