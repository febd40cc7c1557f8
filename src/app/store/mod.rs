//! Document store seam for the vendor collections
//!
//! The refresh pipeline works against two keyed collections: `vendors`
//! (live, read by query traffic) and `temp_vendors` (staging, owned by the
//! in-flight refresh). This module defines the operations the pipeline needs
//! from whichever document store backs those collections, and ships an
//! in-process implementation.
//!
//! The store's native query engine is an external collaborator; only the
//! primitives below are part of this crate's contract.

use async_trait::async_trait;

use crate::app::models::{BoundingBox, Details, Vendor};
use crate::errors::StoreResult;

pub mod memory;

pub use memory::MemoryStore;

/// A keyed vendor collection
///
/// `id` is the upsert key throughout. Implementations must make per-record
/// writes independent so that concurrent detail attachment from enricher
/// workers needs no cross-task ordering.
#[async_trait]
pub trait VendorStore: Send + Sync {
    /// Delete every record in the collection
    async fn clear(&self) -> StoreResult<()>;

    /// Insert or replace a record by id
    ///
    /// When the incoming record carries no detail payload, an existing
    /// payload for the same id is preserved, so listing re-upserts never wipe
    /// enrichment work.
    async fn upsert(&self, vendor: Vendor) -> StoreResult<()>;

    /// Attach a detail payload to the record with the given id
    ///
    /// A missing record is left untouched; staging records always exist by
    /// the time enrichment runs.
    async fn attach_details(&self, id: i64, details: Details) -> StoreResult<()>;

    /// Fetch a single record by id
    async fn get(&self, id: i64) -> StoreResult<Option<Vendor>>;

    /// Total number of records
    async fn count(&self) -> StoreResult<u64>;

    /// Number of records lacking a detail payload
    async fn count_incomplete(&self) -> StoreResult<u64>;

    /// Identifiers of records lacking a detail payload
    async fn incomplete_ids(&self) -> StoreResult<Vec<i64>>;

    /// Identifiers of records carrying a detail payload
    async fn complete_ids(&self) -> StoreResult<Vec<i64>>;

    /// Fetch full records for the given identifiers, skipping unknown ids
    async fn fetch_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Vendor>>;

    /// Set the stale flag on every record
    async fn mark_all_stale(&self) -> StoreResult<()>;

    /// Delete every record still flagged stale, returning how many
    async fn delete_stale(&self) -> StoreResult<u64>;

    /// Records whose coordinates lie inside the bounding box
    async fn find_in_box(&self, bbox: &BoundingBox) -> StoreResult<Vec<Vendor>>;
}
