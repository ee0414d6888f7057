//! # Command-Line Interface
//!
//! `todo-api [serve|migrate|revert|routes]`. Every command runs the
//! bootstrap configurator first, so a misconfigured process fails before it
//! touches the database or binds a socket.

use clap::{Args, Parser, Subcommand};
use todo_core::Environment;
use tokio::net::TcpListener;

use crate::app::Application;
use crate::bootstrap::{self, BootstrapError};
use crate::config::AppConfig;
use crate::openapi;
use crate::services::Services;

/// Todo API server.
#[derive(Parser, Debug)]
#[command(name = "todo-api", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Runtime environment (development, testing, production, ...).
    /// Overrides `APP_ENV`.
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Defaults to `serve`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Apply pending migrations, then serve HTTP requests.
    Serve(ServeArgs),

    /// Apply pending migrations and exit.
    Migrate,

    /// Revert the most recently applied migration and exit.
    Revert,

    /// Print every registered route and exit.
    Routes,
}

#[derive(Args, Debug, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Address to bind. Overrides `HOST`.
    #[arg(long)]
    pub hostname: Option<String>,

    /// Port to bind. Overrides `PORT`.
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Default log filter for the `-v` count.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Environment from `--env`, falling back to `fallback`.
    pub fn environment(&self, fallback: Environment) -> Environment {
        self.env
            .as_deref()
            .and_then(|name| name.parse().ok())
            .unwrap_or(fallback)
    }

    /// Apply command-line overrides to `config`.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(Command::Serve(args)) = &self.command {
            if let Some(hostname) = &args.hostname {
                config.hostname = hostname.clone();
            }
            if let Some(port) = args.port {
                config.port = port;
            }
        }
    }
}

/// Run the selected command to completion.
pub async fn run(
    command: Command,
    mut config: AppConfig,
    mut env: Environment,
) -> Result<(), BootstrapError> {
    let mut services = Services::new();
    bootstrap::configure(&mut config, &mut env, &mut services)?;

    match command {
        Command::Routes => {
            for (method, path) in openapi::route_table() {
                println!("{method:<7} {path}");
            }
            Ok(())
        }
        Command::Migrate => {
            let app = Application::build(services, &config)?;
            let applied = app.migrate().await?;
            println!("{applied} migration(s) applied");
            Ok(())
        }
        Command::Revert => {
            let app = Application::build(services, &config)?;
            let reverted = app.revert().await?;
            println!("{reverted} migration(s) reverted");
            Ok(())
        }
        Command::Serve(_) => {
            let app = Application::build(services, &config)?;
            app.migrate().await?;
            let listener = TcpListener::bind(config.bind_address()).await?;
            app.serve(listener).await
        }
    }
}
