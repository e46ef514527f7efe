//! The `engines` command: lists the engines a run would use.

use anyhow::Result;
use colored::*;

use crate::{
    cli::commands::run::build_registry,
    core::{engine::EngineRegistry, models::EXIT_SUCCESS},
    infra::t,
};

pub fn execute(engine_definitions: &[String], locale: &str) -> Result<u8> {
    let registry = build_registry(engine_definitions)?;
    if registry.is_empty() {
        println!(
            "{}",
            t!(
                "engines.none_found",
                locale = locale,
                known = EngineRegistry::known_engine_names().join(", ")
            )
            .yellow()
        );
    }
    registry.ensure_not_empty()?;

    println!("{}", t!("engines.header", locale = locale, count = registry.len()).bold());
    for spec in registry.specs() {
        let id = format!("{:<12}", spec.id().as_str());
        println!("  {} {}", id.cyan(), spec.command().join(" "));
    }
    Ok(EXIT_SUCCESS)
}
