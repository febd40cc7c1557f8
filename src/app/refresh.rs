//! Refresh coordinator
//!
//! Owns the process-wide refresh lifecycle: clear staging, stage the full
//! listing, loop the enricher until complete or the pass ceiling is hit, then
//! replace the live snapshot with mark-and-sweep. Readers of the live
//! collection are never shown a partially populated dataset; at worst they
//! see records briefly flagged stale during commit (an accepted
//! eventual-consistency window, since staleness is not filtered from reads).
//!
//! Exceeding the enrichment pass ceiling is not fatal: the refresh commits
//! whatever completed, trading completeness for a fresh-enough snapshot.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::client::VendorApi;
use super::enricher::{DetailEnricher, EnricherConfig};
use super::stager::SnapshotStager;
use super::store::VendorStore;
use crate::constants::refresh;
use crate::errors::{RefreshError, RefreshResult};

/// Refresh pipeline tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Listing page size requested from the upstream
    pub page_size: u32,
    /// Maximum enrichment passes before committing whatever completed
    pub max_enrich_passes: u32,
    /// Base delay between enrichment passes
    #[serde(with = "humantime_serde")]
    pub pass_base_delay: Duration,
    /// Per-pass delay multiplier (1.0 = fixed interval)
    pub pass_backoff_multiplier: f64,
    /// Cap on the delay between enrichment passes
    #[serde(with = "humantime_serde")]
    pub pass_max_delay: Duration,
    /// Records copied from staging to live per commit chunk
    pub commit_chunk_size: usize,
    /// Overall wall-clock deadline for one refresh
    #[serde(with = "humantime_serde")]
    pub refresh_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            page_size: refresh::PAGE_SIZE,
            max_enrich_passes: refresh::MAX_ENRICH_PASSES,
            pass_base_delay: refresh::PASS_BASE_DELAY,
            pass_backoff_multiplier: 1.0,
            pass_max_delay: refresh::PASS_MAX_DELAY,
            commit_chunk_size: refresh::COMMIT_CHUNK_SIZE,
            refresh_timeout: refresh::REFRESH_TIMEOUT,
        }
    }
}

impl RefreshConfig {
    /// Delay before the next enrichment pass, capped backoff
    pub fn pass_delay(&self, completed_passes: u32) -> Duration {
        let exponent = completed_passes.saturating_sub(1);
        let millis = self.pass_base_delay.as_millis() as f64
            * self.pass_backoff_multiplier.powi(exponent as i32);
        let capped = millis.min(self.pass_max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Phase of an in-flight refresh, used for logging and error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPhase {
    Clearing,
    Staging,
    Enriching { attempt: u32 },
    Committing,
    Sweeping,
    Done,
}

impl fmt::Display for RefreshPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshPhase::Clearing => write!(f, "clearing"),
            RefreshPhase::Staging => write!(f, "staging"),
            RefreshPhase::Enriching { attempt } => write!(f, "enriching (pass {attempt})"),
            RefreshPhase::Committing => write!(f, "committing"),
            RefreshPhase::Sweeping => write!(f, "sweeping"),
            RefreshPhase::Done => write!(f, "done"),
        }
    }
}

/// Outcome of a completed refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Records staged from the listing
    pub staged: u64,
    /// Enrichment passes run
    pub passes: u32,
    /// Incomplete records abandoned at commit time
    pub residual_incomplete: u64,
    /// Records copied into the live collection
    pub committed: u64,
    /// Stale records swept from the live collection
    pub swept: u64,
}

/// Sequences one refresh over the staging and live collections
///
/// Constructed per serving process with explicit store handles; the staging
/// collection is exclusively owned by the in-flight refresh, and the live
/// collection is mutated only by the commit and sweep phases here.
pub struct RefreshCoordinator {
    api: Arc<dyn VendorApi>,
    staging: Arc<dyn VendorStore>,
    live: Arc<dyn VendorStore>,
    config: RefreshConfig,
    enricher_config: EnricherConfig,
}

impl RefreshCoordinator {
    /// Create a coordinator over the given collections
    pub fn new(
        api: Arc<dyn VendorApi>,
        staging: Arc<dyn VendorStore>,
        live: Arc<dyn VendorStore>,
        config: RefreshConfig,
        enricher_config: EnricherConfig,
    ) -> Self {
        Self {
            api,
            staging,
            live,
            config,
            enricher_config,
        }
    }

    /// Run one refresh under the configured wall-clock deadline
    ///
    /// # Errors
    ///
    /// Fatal failures (clearing, staging, count queries, commit reads,
    /// sweeping, deadline expiry) return the first encountered error. A
    /// failure before commit leaves the live collection at its pre-refresh
    /// state; a sweep failure leaves it stale-inclusive but never missing
    /// fresh records.
    pub async fn refresh(&self) -> RefreshResult<RefreshSummary> {
        let deadline = self.config.refresh_timeout;
        match tokio::time::timeout(deadline, self.run_phases()).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Refresh aborted: deadline of {:?} exceeded", deadline);
                Err(RefreshError::DeadlineExceeded {
                    timeout_secs: deadline.as_secs(),
                })
            }
        }
    }

    async fn run_phases(&self) -> RefreshResult<RefreshSummary> {
        info!("Refreshing vendors...");
        let mut summary = RefreshSummary::default();

        // Clearing
        info!("Refresh phase: {}", RefreshPhase::Clearing);
        self.staging.clear().await.map_err(RefreshError::Clearing)?;

        // Staging
        info!("Refresh phase: {}", RefreshPhase::Staging);
        let stager = SnapshotStager::new(
            Arc::clone(&self.api),
            Arc::clone(&self.staging),
            self.config.page_size,
        );
        summary.staged = stager.stage_all().await?;

        // Enriching, up to the pass ceiling
        summary.residual_incomplete = summary.staged;
        while summary.passes < self.config.max_enrich_passes {
            summary.passes += 1;
            info!(
                "Refresh phase: {}",
                RefreshPhase::Enriching {
                    attempt: summary.passes
                }
            );

            let enricher = DetailEnricher::new(
                Arc::clone(&self.api),
                Arc::clone(&self.staging),
                self.enricher_config.clone(),
            );
            let outcome = enricher.enrich_pass().await?;
            summary.residual_incomplete = outcome.residual_incomplete;

            if outcome.residual_incomplete == 0 {
                break;
            }
            if summary.passes < self.config.max_enrich_passes {
                tokio::time::sleep(self.config.pass_delay(summary.passes)).await;
            }
        }
        if summary.residual_incomplete > 0 {
            warn!(
                "Enrichment ceiling reached with {} incomplete vendors; committing without them",
                summary.residual_incomplete
            );
        }

        // Committing
        info!("Refresh phase: {}", RefreshPhase::Committing);
        summary.committed = self.commit().await?;

        // Sweeping
        info!("Refresh phase: {}", RefreshPhase::Sweeping);
        summary.swept = self.live.delete_stale().await.map_err(RefreshError::Sweeping)?;
        info!("Removed {} stale vendors", summary.swept);

        info!(
            "Refresh phase: {} ({} staged, {} committed, {} passes)",
            RefreshPhase::Done,
            summary.staged,
            summary.committed,
            summary.passes
        );
        Ok(summary)
    }

    /// Copy complete staging records into the live collection in chunks
    ///
    /// Every live record is flagged stale first; each copied record clears
    /// its own flag, so records absent from this snapshot remain flagged for
    /// the sweep. A per-record upsert failure is logged and skipped.
    async fn commit(&self) -> RefreshResult<u64> {
        self.live
            .mark_all_stale()
            .await
            .map_err(RefreshError::Committing)?;

        let ids = self
            .staging
            .complete_ids()
            .await
            .map_err(RefreshError::Committing)?;
        let total = ids.len();
        info!("Total vendors to commit: {}", total);

        let mut committed = 0u64;
        for chunk in ids.chunks(self.config.commit_chunk_size) {
            let records = self
                .staging
                .fetch_by_ids(chunk)
                .await
                .map_err(RefreshError::Committing)?;

            for mut record in records {
                record.stale = false;
                let id = record.id;
                match self.live.upsert(record).await {
                    Ok(()) => committed += 1,
                    Err(e) => {
                        warn!("Error upserting vendor {}: {}", id, e);
                    }
                }
            }
            info!("Processed {}/{} vendors", committed, total);
        }

        Ok(committed)
    }
}
