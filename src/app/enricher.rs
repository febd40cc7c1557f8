//! Concurrent detail enricher
//!
//! Drives the detail endpoint over the staging records that still lack a
//! payload. Work is partitioned into fixed-size batches; within a batch one
//! task runs per vendor, bounded by a semaphore, and the next batch does not
//! start until the current one drains. A short pause between batches keeps
//! the upstream request rate from bursting.
//!
//! Individual detail failures are non-fatal: the record stays incomplete and
//! is picked up again on the next pass. There is no dead-letter tracking.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::client::VendorApi;
use super::store::VendorStore;
use crate::constants::refresh;
use crate::errors::{RefreshError, RefreshResult};

/// Enricher tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Vendors grouped into one batch
    pub batch_size: usize,
    /// Maximum simultaneously in-flight detail calls
    pub concurrency: usize,
    /// Pause between batches
    #[serde(with = "humantime_serde")]
    pub batch_pause: Duration,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            batch_size: refresh::DETAIL_BATCH_SIZE,
            concurrency: refresh::DETAIL_CONCURRENCY,
            batch_pause: refresh::BATCH_PAUSE,
        }
    }
}

/// Result of a single enrichment pass
///
/// A pass makes no completeness guarantee; `residual_incomplete` tells the
/// orchestrator whether another pass is needed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Records selected for this pass
    pub attempted: u64,
    /// Details fetched and persisted
    pub completed: u64,
    /// Failures left for a later pass
    pub failed: u64,
    /// Incomplete records remaining after the pass
    pub residual_incomplete: u64,
}

/// Enriches staging records with detail payloads under bounded concurrency
pub struct DetailEnricher {
    api: Arc<dyn VendorApi>,
    staging: Arc<dyn VendorStore>,
    config: EnricherConfig,
}

impl DetailEnricher {
    /// Create an enricher over the given staging collection
    pub fn new(
        api: Arc<dyn VendorApi>,
        staging: Arc<dyn VendorStore>,
        config: EnricherConfig,
    ) -> Self {
        Self {
            api,
            staging,
            config,
        }
    }

    /// Run one enrichment pass over every currently incomplete record
    ///
    /// # Errors
    ///
    /// Only store query failures are fatal; per-vendor detail failures are
    /// logged and absorbed into the outcome.
    pub async fn enrich_pass(&self) -> RefreshResult<PassOutcome> {
        let ids = self
            .staging
            .incomplete_ids()
            .await
            .map_err(RefreshError::Enriching)?;

        let mut outcome = PassOutcome {
            attempted: ids.len() as u64,
            ..Default::default()
        };

        if ids.is_empty() {
            return Ok(outcome);
        }

        info!("Enriching {} vendors without details", ids.len());
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let batch_count = ids.len().div_ceil(self.config.batch_size);

        for (batch_index, batch) in ids.chunks(self.config.batch_size).enumerate() {
            let mut tasks: JoinSet<bool> = JoinSet::new();

            for &id in batch {
                let api = Arc::clone(&self.api);
                let staging = Arc::clone(&self.staging);
                let semaphore = Arc::clone(&semaphore);

                tasks.spawn(async move {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .expect("enrichment semaphore closed");

                    let details = match api.fetch_details(id).await {
                        Ok(details) => details,
                        Err(e) => {
                            warn!("Detail fetch failed for vendor {}: {}", id, e);
                            return false;
                        }
                    };

                    match staging.attach_details(id, details).await {
                        Ok(()) => true,
                        Err(e) => {
                            warn!("Detail persist failed for vendor {}: {}", id, e);
                            false
                        }
                    }
                });
            }

            // Batch N+1 never starts before batch N drains
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(true) => outcome.completed += 1,
                    Ok(false) => outcome.failed += 1,
                    Err(e) => {
                        warn!("Enrichment task panicked: {}", e);
                        outcome.failed += 1;
                    }
                }
            }

            debug!("Completed batch {}/{}", batch_index + 1, batch_count);
            if batch_index + 1 < batch_count {
                tokio::time::sleep(self.config.batch_pause).await;
            }
        }

        outcome.residual_incomplete = self
            .staging
            .count_incomplete()
            .await
            .map_err(RefreshError::Enriching)?;

        info!(
            "Enrichment pass done: {}/{} completed, {} residual",
            outcome.completed, outcome.attempted, outcome.residual_incomplete
        );
        Ok(outcome)
    }
}
