//! Start the Proctor Hub server.

use clap::Args;

use proctor_core::config::AppConfig;
use proctor_core::error::AppError;
use proctor_entity::session::VIOLATION_THRESHOLD;

use crate::output;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Start with an empty test catalog
    #[arg(long)]
    pub no_demo: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.no_demo {
        config.exam.seed_demo_catalog = false;
    }

    println!("Starting Proctor Hub server...");
    output::print_kv("Address", &config.server.bind_address());
    output::print_kv(
        "Violation threshold",
        &VIOLATION_THRESHOLD.to_string(),
    );
    output::print_kv(
        "Heartbeat timeout",
        &format!("{}s", config.exam.heartbeat_timeout_seconds),
    );

    proctor_api::run_server(config).await
}
