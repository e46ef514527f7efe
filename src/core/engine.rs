//! # Engine Registry / 引擎注册表
//!
//! The execution engines a plugin can be run on. The registry is fixed once
//! the process has started: either discovered from the `PATH` or given
//! explicitly with `--engine <ID=COMMAND>`.
//!
//! 可以运行插件的执行引擎。注册表在进程启动后即固定：
//! 要么从 `PATH` 中发现，要么通过 `--engine <ID=COMMAND>` 显式给出。

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::core::config::{RuntimeConfig, validate_identifier};
use crate::core::error::{SuiteError, SuiteResult};

/// Placeholder replaced with the effective plugin artifact path.
pub const PLUGIN_PLACEHOLDER: &str = "{plugin}";
/// Placeholder replaced with the effective plugin configuration path.
pub const CONFIG_PLACEHOLDER: &str = "{config}";
/// Placeholder replaced with the effective minimum log level.
pub const LOG_LEVEL_PLACEHOLDER: &str = "{log_level}";

/// Engines probed on the `PATH` when none are given explicitly.
const KNOWN_ENGINES: &[(&str, &str)] = &[
    ("wasmtime", "wasmtime run --dir=. {plugin}"),
    ("wasmer", "wasmer run --dir=. {plugin}"),
    ("wasmedge", "wasmedge --dir .:. {plugin}"),
    ("iwasm", "iwasm --dir=. {plugin}"),
];

/// Identifier of an execution engine, safe to embed in a unit id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EngineId(String);

impl EngineId {
    pub fn new(id: impl Into<String>) -> SuiteResult<Self> {
        let id = id.into();
        validate_identifier(&id).map_err(|reason| SuiteError::invalid_engine(&id, &reason))?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An engine id together with the command template used to launch it.
/// The template always holds at least one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSpec {
    id: EngineId,
    command: Vec<String>,
}

impl EngineSpec {
    /// Creates a spec from an id and a shell-like command line.
    ///
    /// # Errors
    /// Fails when the id is unsafe or the command is empty or unbalanced.
    pub fn new(id: &str, command: &str) -> SuiteResult<Self> {
        let id = EngineId::new(id)?;
        let command = shlex::split(command)
            .ok_or_else(|| SuiteError::invalid_engine(command, "unbalanced quotes"))?;
        if command.is_empty() {
            return Err(SuiteError::invalid_engine(id.as_str(), "empty command"));
        }
        Ok(Self { id, command })
    }

    /// Parses an `ID=COMMAND` definition as given on the command line.
    pub fn parse(spec: &str) -> SuiteResult<Self> {
        let (id, command) = spec
            .split_once('=')
            .ok_or_else(|| SuiteError::invalid_engine(spec, "expected ID=COMMAND"))?;
        Self::new(id.trim(), command)
    }

    pub fn id(&self) -> &EngineId {
        &self.id
    }

    /// The unrendered command template, one token per argument.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// The program that launches this engine.
    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    /// Substitutes the placeholders of the command template.
    /// A token that consisted only of a placeholder whose value is empty is
    /// dropped instead of being passed as an empty argument.
    pub fn render(&self, config: &RuntimeConfig) -> Vec<String> {
        let plugin = config.plugin_path.to_string_lossy();
        let cfg = config.config_path.to_string_lossy();
        let level = if config.min_log_level.is_defined() {
            config.min_log_level.as_str()
        } else {
            ""
        };

        self.command
            .iter()
            .filter_map(|token| {
                let rendered = token
                    .replace(PLUGIN_PLACEHOLDER, &plugin)
                    .replace(CONFIG_PLACEHOLDER, &cfg)
                    .replace(LOG_LEVEL_PLACEHOLDER, level);
                let was_placeholder =
                    [PLUGIN_PLACEHOLDER, CONFIG_PLACEHOLDER, LOG_LEVEL_PLACEHOLDER]
                        .contains(&token.as_str());
                (!(was_placeholder && rendered.is_empty())).then_some(rendered)
            })
            .collect()
    }
}

/// Ordered set of available engines.
/// 可用引擎的有序集合。
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    engines: Vec<EngineSpec>,
}

impl EngineRegistry {
    /// Builds an explicit registry, keeping the given order.
    pub fn from_specs(specs: Vec<EngineSpec>) -> SuiteResult<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.id().clone()) {
                return Err(SuiteError::DuplicateEngine(spec.id().to_string()));
            }
        }
        Ok(Self { engines: specs })
    }

    /// Discovers the known engines installed on the `PATH`.
    pub fn discover() -> Self {
        Self::discover_with(|program| which::which(program).is_ok())
    }

    /// Discovers the known engines for which `is_installed` returns `true`.
    pub fn discover_with(is_installed: impl Fn(&str) -> bool) -> Self {
        let engines = KNOWN_ENGINES
            .iter()
            .filter_map(|(id, command)| EngineSpec::new(id, command).ok())
            .filter(|spec| {
                let found = is_installed(spec.program());
                tracing::debug!(engine = %spec.id(), found, "probing engine");
                found
            })
            .collect();
        Self { engines }
    }

    /// Names of the engines probed by [`EngineRegistry::discover`].
    pub fn known_engine_names() -> Vec<&'static str> {
        KNOWN_ENGINES.iter().map(|(id, _)| *id).collect()
    }

    /// Engine ids in registration order.
    pub fn list_engines(&self) -> Vec<EngineId> {
        self.engines.iter().map(|spec| spec.id().clone()).collect()
    }

    pub fn get(&self, id: &EngineId) -> Option<&EngineSpec> {
        self.engines.iter().find(|spec| spec.id() == id)
    }

    pub fn specs(&self) -> &[EngineSpec] {
        &self.engines
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Fails with [`SuiteError::NoEngines`] when nothing is registered.
    pub fn ensure_not_empty(&self) -> SuiteResult<()> {
        if self.is_empty() {
            return Err(SuiteError::NoEngines {
                searched: Self::known_engine_names().join(", "),
            });
        }
        Ok(())
    }
}
