//! Vendor Mirror CLI application
//!
//! Command-line entry point for the vendor catalog mirror: one-shot refresh,
//! scheduled refresh loop, and status reporting.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use vendor_mirror::cli::{handle_refresh, handle_run, handle_status, Cli, Commands};
use vendor_mirror::config::AppConfig;
use vendor_mirror::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("Vendor Mirror v{} starting", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load(cli.global.config.as_deref())?;

    match cli.command {
        Commands::Refresh(args) => {
            info!("Executing refresh command");
            handle_refresh(args, config).await
        }
        Commands::Run(args) => {
            info!("Executing run command");
            handle_run(args, config).await
        }
        Commands::Status => handle_status(config).await,
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("vendor_mirror={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();
}
