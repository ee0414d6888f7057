//! # todo-api — Binary Entry Point
//!
//! Parses the command line, reads configuration from the environment,
//! installs tracing and runs the selected command. Any bootstrap failure
//! exits non-zero before a socket is bound.

use std::process::ExitCode;

use clap::Parser;
use todo_api::cli::{self, Cli, Command, ServeArgs};
use todo_api::config::{self, AppConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut app_config, invalid) = AppConfig::from_env();
    cli.apply_overrides(&mut app_config);
    config::init_tracing(app_config.log_format, cli.log_directive());
    for value in &invalid {
        value.log();
    }

    let env = cli.environment(config::environment_from_env());
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match cli::run(command, app_config, env).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "startup failed");
            ExitCode::FAILURE
        }
    }
}
