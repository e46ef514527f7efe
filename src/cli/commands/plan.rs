//! The `plan` command: a dry run that prints the expanded matrix.

use anyhow::Result;
use std::path::Path;

use crate::{
    cli::commands::run::{self, PreparedRun},
    core::{models::EXIT_SUCCESS, overrides::Override},
    infra::t,
};

/// Plans the suite exactly as `run` would and prints one unit id per line.
pub fn execute(
    suite_path: &Path,
    overrides: &Override,
    engine_definitions: &[String],
    locale: &str,
) -> Result<u8> {
    let PreparedRun { plan, config, .. } =
        run::prepare(suite_path, overrides, engine_definitions, locale)?;

    println!(
        "{}",
        t!("plan.plugin", locale = locale, path = config.plugin_path.display())
    );
    for id in plan.unit_ids() {
        println!("{id}");
    }
    Ok(EXIT_SUCCESS)
}
