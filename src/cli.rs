// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::overrides::Override;
use crate::infra::{fs, logging, t};

pub mod commands;

use commands::run::RunOptions;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn suite_args(locale: &str) -> [Arg; 4] {
    [
        Arg::new("suite")
            .short('s')
            .long("suite")
            .help(t!("arg_suite", locale = locale).to_string())
            .value_name("SUITE")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("plugin")
            .long("plugin")
            .help(t!("arg_plugin", locale = locale).to_string())
            .value_name("PLUGIN")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("config")
            .long("config")
            .help(t!("arg_config", locale = locale).to_string())
            .value_name("CONFIG")
            .value_parser(clap::value_parser!(PathBuf))
            .action(ArgAction::Set),
        Arg::new("min-log-level")
            .long("min-log-level")
            .help(t!("arg_min_log_level", locale = locale).to_string())
            .value_name("LEVEL")
            .action(ArgAction::Set),
    ]
}

fn engine_arg(locale: &str) -> Arg {
    Arg::new("engine")
        .short('e')
        .long("engine")
        .help(t!("arg_engine", locale = locale).to_string())
        .value_name("ID=COMMAND")
        .action(ArgAction::Append)
}

fn build_cli(locale: &str) -> Command {
    Command::new("plugin-matrix-runner")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli_verbose", locale = locale).to_string())
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .args(suite_args(locale))
                .arg(engine_arg(locale))
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help(t!("arg_jobs", locale = locale).to_string())
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("html")
                        .long("html")
                        .help(t!("arg_html", locale = locale).to_string())
                        .value_name("HTML")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help(t!("arg_json", locale = locale).to_string())
                        .value_name("JSON")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about(t!("cmd_plan_about", locale = locale).to_string())
                .args(suite_args(locale))
                .arg(engine_arg(locale)),
        )
        .subcommand(
            Command::new("engines")
                .about(t!("cmd_engines_about", locale = locale).to_string())
                .arg(engine_arg(locale)),
        )
}

/// Collects the override flags. Unset flags stay absent; path flags are
/// resolved against the working directory.
fn overrides_from(matches: &ArgMatches) -> Result<Override> {
    let mut overrides = Override::new();
    let given = |id: &str| {
        matches
            .get_one::<PathBuf>(id)
            .filter(|path| !path.as_os_str().is_empty())
    };
    if let Some(plugin) = given("plugin") {
        overrides = overrides.with_plugin_path(fs::absolute_path(plugin)?);
    }
    if let Some(config) = given("config") {
        overrides = overrides.with_config_path(fs::absolute_path(config)?);
    }
    if let Some(level) = matches.get_one::<String>("min-log-level") {
        overrides = overrides.with_log_level_text(level);
    }
    Ok(overrides)
}

fn engines_from(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("engine")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Parses the command line and runs the selected command.
///
/// # Returns
/// The process exit code: `0` when everything passed, `1` when units failed.
/// Setup failures are returned as `Err`.
pub async fn run() -> Result<u8> {
    // Pre-parse language and initialize i18n first.
    match pre_parse_language() {
        Some(language) => rust_i18n::set_locale(&language),
        None => crate::init(),
    }
    let locale = rust_i18n::locale().to_string();

    let matches = build_cli(&locale).get_matches();
    logging::init_cli(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let options = RunOptions {
                suite: run_matches
                    .get_one::<PathBuf>("suite")
                    .cloned()
                    .unwrap_or_default(), // Required by clap
                overrides: overrides_from(run_matches)?,
                engines: engines_from(run_matches),
                jobs: run_matches.get_one::<usize>("jobs").copied(),
                html: run_matches.get_one::<PathBuf>("html").cloned(),
                json: run_matches.get_one::<PathBuf>("json").cloned(),
            };
            commands::run::execute(options, &locale).await
        }
        Some(("plan", plan_matches)) => {
            let suite = plan_matches
                .get_one::<PathBuf>("suite")
                .cloned()
                .unwrap_or_default(); // Required by clap
            commands::plan::execute(
                &suite,
                &overrides_from(plan_matches)?,
                &engines_from(plan_matches),
                &locale,
            )
        }
        Some(("engines", engine_matches)) => {
            commands::engines::execute(&engines_from(engine_matches), &locale)
        }
        // `subcommand_required` makes clap print help and exit before this.
        _ => Ok(crate::core::models::EXIT_SUCCESS),
    }
}
