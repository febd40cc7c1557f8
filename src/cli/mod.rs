//! Command-line interface for Vendor Mirror

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, GlobalArgs, RefreshArgs, RunArgs};
pub use commands::{build_pipeline, handle_refresh, handle_run, handle_status};
