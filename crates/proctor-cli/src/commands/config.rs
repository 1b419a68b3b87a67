//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use proctor_core::config::AppConfig;
use proctor_core::error::AppError;

use crate::output;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration as JSON
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig) -> Result<(), AppError> {
    match args.command {
        ConfigCommand::Show => output::print_item(config),
    }
    Ok(())
}
