//! Core application modules for Vendor Mirror
//!
//! Contains the refresh pipeline and its collaborators: the upstream API
//! client, the document store seam, the stager, the concurrent detail
//! enricher, the refresh coordinator, and the geographic query contract.

pub mod client;
pub mod enricher;
pub mod models;
pub mod query;
pub mod refresh;
pub mod stager;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use client::{ClientConfig, VendorApi, VendorApiClient};
pub use enricher::{DetailEnricher, EnricherConfig, PassOutcome};
pub use models::{BoundingBox, Details, Vendor, VendorDto, VendorPage};
pub use query::vendors_in_box;
pub use refresh::{RefreshConfig, RefreshCoordinator, RefreshPhase, RefreshSummary};
pub use stager::SnapshotStager;
pub use store::{MemoryStore, VendorStore};
