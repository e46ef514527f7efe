use plugin_matrix_runner::{cli, models::EXIT_SETUP_FAILED};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match cli::run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_SETUP_FAILED)
        }
    }
}
