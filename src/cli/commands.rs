//! CLI command handlers
//!
//! Wires configuration, credentials, client, and stores into the refresh
//! coordinator. Store handles are constructed here and passed in explicitly;
//! nothing in the pipeline reaches for ambient globals.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use super::args::{RefreshArgs, RunArgs};
use crate::app::{
    MemoryStore, RefreshCoordinator, RefreshSummary, VendorApiClient, VendorStore,
};
use crate::auth::{get_auth_status, load_jwt_token};
use crate::config::AppConfig;
use crate::errors::Result;

/// Fully wired refresh pipeline for one process
pub struct Pipeline {
    pub coordinator: RefreshCoordinator,
    pub live: Arc<dyn VendorStore>,
}

/// Construct the pipeline from configuration and the environment credential
///
/// # Errors
///
/// Fails fast when the JWT credential is absent or the HTTP client cannot be
/// built.
pub fn build_pipeline(config: &AppConfig) -> Result<Pipeline> {
    let token = load_jwt_token()?;
    let api = Arc::new(VendorApiClient::new_with_config(
        token,
        config.client.clone(),
    )?);

    let staging: Arc<dyn VendorStore> = Arc::new(MemoryStore::new());
    let live: Arc<dyn VendorStore> = Arc::new(MemoryStore::new());

    let coordinator = RefreshCoordinator::new(
        api,
        staging,
        Arc::clone(&live),
        config.refresh.clone(),
        config.enricher.clone(),
    );

    Ok(Pipeline { coordinator, live })
}

/// Handle the one-shot refresh command
pub async fn handle_refresh(args: RefreshArgs, mut config: AppConfig) -> Result<()> {
    if let Some(max_passes) = args.max_passes {
        config.refresh.max_enrich_passes = max_passes;
    }

    let pipeline = build_pipeline(&config)?;
    let summary = pipeline.coordinator.refresh().await?;
    log_summary(&summary);
    Ok(())
}

/// Handle the scheduled refresh loop
///
/// A failed refresh is logged and the loop keeps running; the live snapshot
/// simply does not advance until the next interval.
pub async fn handle_run(args: RunArgs, config: AppConfig) -> Result<()> {
    let interval = Duration::from_secs(args.interval_hours * 60 * 60);
    let pipeline = build_pipeline(&config)?;

    info!(
        "Scheduled refresh every {}h; running first refresh now",
        args.interval_hours
    );
    loop {
        match pipeline.coordinator.refresh().await {
            Ok(summary) => log_summary(&summary),
            Err(e) => error!("Refresh failed ({}): snapshot not advanced", e),
        }
        tokio::time::sleep(interval).await;
    }
}

/// Handle the status command
pub async fn handle_status(config: AppConfig) -> Result<()> {
    let status = get_auth_status();
    println!("Credential: {}", status.status_message());
    println!(
        "Refresh: page size {}, {} passes max, commit chunks of {}",
        config.refresh.page_size,
        config.refresh.max_enrich_passes,
        config.refresh.commit_chunk_size
    );
    println!(
        "Enricher: batches of {}, concurrency {}",
        config.enricher.batch_size, config.enricher.concurrency
    );
    Ok(())
}

fn log_summary(summary: &RefreshSummary) {
    info!(
        "Refresh done: {} staged, {} committed, {} swept, {} passes, {} left incomplete",
        summary.staged, summary.committed, summary.swept, summary.passes, summary.residual_incomplete
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::env as env_constants;

    #[test]
    fn test_build_pipeline_requires_credential() {
        std::env::remove_var(env_constants::JWT);
        let result = build_pipeline(&AppConfig::default());
        assert!(result.is_err());
    }
}
