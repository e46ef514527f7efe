//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the runner,
//! including process execution, the process-backed plugin runtime,
//! file system helpers, logging and i18n support.
//!
//! 此模块为运行器提供基础设施服务，
//! 包括进程执行、基于进程的插件运行时、文件系统工具、日志和国际化支持。

pub mod command;
pub mod fs;
pub mod logging;
pub mod runtime;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
