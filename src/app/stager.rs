//! Snapshot stager
//!
//! Drains the upstream listing into the staging collection: page after page
//! of base records, no detail payloads yet. A failed page aborts staging
//! entirely, because committing an incomplete listing would silently drop
//! vendors from the snapshot.

use std::sync::Arc;

use tracing::{debug, info};

use super::client::VendorApi;
use super::store::VendorStore;
use crate::errors::{RefreshError, RefreshResult};

/// Populates the staging collection from the paginated listing
pub struct SnapshotStager {
    api: Arc<dyn VendorApi>,
    staging: Arc<dyn VendorStore>,
    page_size: u32,
}

impl SnapshotStager {
    /// Create a stager writing into the given staging collection
    pub fn new(api: Arc<dyn VendorApi>, staging: Arc<dyn VendorStore>, page_size: u32) -> Self {
        Self {
            api,
            staging,
            page_size,
        }
    }

    /// Fetch every listing page and upsert its vendors into staging
    ///
    /// Pages are requested with an incrementing 1-indexed page number until a
    /// page comes back empty. Returns the number of records staged.
    ///
    /// # Errors
    ///
    /// The first listing fetch or store failure aborts staging and propagates
    /// upward; there is no partial-page retry at this layer.
    pub async fn stage_all(&self) -> RefreshResult<u64> {
        info!("Staging vendor listing...");

        let mut page_number = 1;
        let mut staged = 0u64;

        loop {
            let vendors = self
                .api
                .fetch_page(page_number, self.page_size)
                .await
                .map_err(RefreshError::Staging)?;

            if vendors.is_empty() {
                break;
            }

            let page_count = vendors.len();
            for vendor in vendors {
                self.staging
                    .upsert(vendor)
                    .await
                    .map_err(RefreshError::StagingStore)?;
            }
            staged += page_count as u64;

            debug!("Staged page {} ({} vendors)", page_number, page_count);
            page_number += 1;
        }

        info!("Staging complete: {} vendors across {} pages", staged, page_number - 1);
        Ok(staged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::MemoryStore;
    use crate::app::testing::{sample_vendor, ScriptedApi};

    #[tokio::test]
    async fn test_stage_all_drains_every_page() {
        let api = Arc::new(ScriptedApi::new(vec![
            vec![sample_vendor(1), sample_vendor(2)],
            vec![sample_vendor(3)],
        ]));
        let staging = Arc::new(MemoryStore::new());
        let stager = SnapshotStager::new(api, staging.clone(), 2);

        let staged = stager.stage_all().await.unwrap();
        assert_eq!(staged, 3);
        assert_eq!(staging.count().await.unwrap(), 3);
        // Staged records are base records only
        assert_eq!(staging.count_incomplete().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_stage_all_stops_on_first_empty_page() {
        let api = Arc::new(ScriptedApi::new(vec![vec![sample_vendor(1)]]));
        let staging = Arc::new(MemoryStore::new());
        let stager = SnapshotStager::new(api, staging.clone(), 20);

        assert_eq!(stager.stage_all().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_page_failure_aborts_staging() {
        let api = Arc::new(
            ScriptedApi::new(vec![
                vec![sample_vendor(1)],
                vec![sample_vendor(2)],
                vec![sample_vendor(3)],
            ])
            .fail_page(2),
        );
        let staging = Arc::new(MemoryStore::new());
        let stager = SnapshotStager::new(api, staging.clone(), 20);

        let err = stager.stage_all().await.unwrap_err();
        assert!(matches!(err, RefreshError::Staging(_)));
        // The first page landed before the abort
        assert_eq!(staging.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_ids_across_pages_upsert_once() {
        let api = Arc::new(ScriptedApi::new(vec![
            vec![sample_vendor(1)],
            vec![sample_vendor(1), sample_vendor(2)],
        ]));
        let staging = Arc::new(MemoryStore::new());
        let stager = SnapshotStager::new(api, staging.clone(), 20);

        stager.stage_all().await.unwrap();
        assert_eq!(staging.count().await.unwrap(), 2);
    }
}
