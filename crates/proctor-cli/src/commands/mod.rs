//! CLI command definitions and dispatch.

pub mod config;
pub mod serve;
pub mod simulate;

use clap::{Parser, Subcommand};

use proctor_core::config::AppConfig;
use proctor_core::error::AppError;

use crate::output::OutputFormat;

/// Proctor Hub: proctored exam sessions with violation monitoring
#[derive(Debug, Parser)]
#[command(name = "proctor", version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file; the `PROCTOR_ENV` profile is used when absent
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Run one exam session against simulated monitors
    Simulate(simulate::SimulateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let app_config = load_config(self.config.as_deref())?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, app_config).await,
            Commands::Config(args) => config::execute(args, &app_config),
            Commands::Simulate(args) => simulate::execute(args, app_config, self.format).await,
        }
    }
}

/// Load configuration from an explicit file or the `PROCTOR_ENV` profile.
pub fn load_config(path: Option<&str>) -> Result<AppConfig, AppError> {
    match path {
        Some(path) => {
            tracing::debug!(path, "Loading configuration file");
            AppConfig::load_from(path)
        }
        None => {
            let env = std::env::var("PROCTOR_ENV").unwrap_or_else(|_| "development".to_string());
            tracing::debug!(env = %env, "Loading configuration profile");
            AppConfig::load(&env)
        }
    }
}
