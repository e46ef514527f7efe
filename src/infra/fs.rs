//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides the few file system utilities the runner needs:
//! reading the suite document, expanding user paths and anchoring relative
//! paths.
//!
//! 此模块提供运行器所需的少量文件系统工具：
//! 读取测试套件文档、展开用户路径以及锚定相对路径。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{SuiteError, SuiteResult};

/// Reads the suite document at `path` into a string.
///
/// # Errors
/// Returns [`SuiteError::Read`] if the file is missing or unreadable.
pub fn read_document(path: &Path) -> SuiteResult<String> {
    fs::read_to_string(path).map_err(|source| SuiteError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Expands `~` and `$VAR` / `${VAR}` references in a path.
///
/// # Errors
/// Fails when the path references an undefined environment variable.
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Joins a relative `path` onto `base_dir`; absolute paths are returned as is.
pub fn anchor_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base_dir.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Expands and then resolves a command-line path against the working directory.
///
/// # Arguments
/// * `path` - Path as typed by the user
///
/// # Returns
/// An absolute path when the working directory is known, otherwise the
/// expanded path unchanged.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let expanded = expand_path(path)?;
    if expanded.is_absolute() {
        return Ok(expanded);
    }
    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    Ok(cwd.join(expanded))
}
