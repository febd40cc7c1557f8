//! Command-line argument parsing for Vendor Mirror
//!
//! Defines the CLI structure using clap derive macros: a one-shot refresh, a
//! scheduled refresh loop, and a status report.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Vendor Mirror - mirror a vendor catalog into a local document store
#[derive(Parser, Debug)]
#[command(
    name = "vendor_mirror",
    version,
    about = "Mirror a paginated vendor catalog with detail enrichment",
    long_about = "Mirrors a third-party vendor catalog into a local document store: stages the \
paginated listing, enriches every vendor with a detail call under bounded concurrency, and \
replaces the live snapshot without exposing a partially populated dataset."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one refresh and exit
    Refresh(RefreshArgs),

    /// Refresh on a fixed interval, indefinitely
    Run(RunArgs),

    /// Report credential and configuration status
    Status,
}

/// Arguments for the refresh command
#[derive(Args, Debug, Clone)]
pub struct RefreshArgs {
    /// Cap on enrichment passes, overriding configuration
    #[arg(long)]
    pub max_passes: Option<u32>,
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Hours between scheduled refreshes
    #[arg(long, default_value = "6")]
    pub interval_hours: u64,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the log level from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.global.very_verbose {
            "trace"
        } else if self.global.verbose {
            "debug"
        } else if self.global.quiet {
            "error"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_command_parses() {
        let cli = Cli::try_parse_from(["vendor_mirror", "refresh", "--max-passes", "3"]).unwrap();
        match cli.command {
            Commands::Refresh(args) => assert_eq!(args.max_passes, Some(3)),
            _ => panic!("expected refresh command"),
        }
    }

    #[test]
    fn test_run_command_defaults_to_six_hours() {
        let cli = Cli::try_parse_from(["vendor_mirror", "run"]).unwrap();
        match cli.command {
            Commands::Run(args) => assert_eq!(args.interval_hours, 6),
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_verbosity_flags_resolve_log_level() {
        let cli = Cli::try_parse_from(["vendor_mirror", "--very-verbose", "status"]).unwrap();
        assert_eq!(cli.log_level(), "trace");

        let cli = Cli::try_parse_from(["vendor_mirror", "-v", "status"]).unwrap();
        assert_eq!(cli.log_level(), "debug");

        let cli = Cli::try_parse_from(["vendor_mirror", "-q", "status"]).unwrap();
        assert_eq!(cli.log_level(), "error");
    }
}
