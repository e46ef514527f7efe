//! Subcommand implementations.

pub mod engines;
pub mod plan;
pub mod run;
