//! In-process vendor collection
//!
//! A `BTreeMap` keyed by vendor id behind an async `RwLock`. Serves as the
//! document store for single-process deployments and as the fixture store in
//! tests. Per-record writes take the lock briefly, so enricher workers can
//! attach details concurrently without coordination.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::VendorStore;
use crate::app::models::{BoundingBox, Details, Vendor};
use crate::errors::StoreResult;

/// In-memory keyed vendor collection
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, Vendor>>,
}

impl MemoryStore {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VendorStore for MemoryStore {
    async fn clear(&self) -> StoreResult<()> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn upsert(&self, mut vendor: Vendor) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if vendor.details.is_none() {
            if let Some(existing) = records.get(&vendor.id) {
                vendor.details = existing.details.clone();
            }
        }
        records.insert(vendor.id, vendor);
        Ok(())
    }

    async fn attach_details(&self, id: i64, details: Details) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if let Some(vendor) = records.get_mut(&id) {
            vendor.details = Some(details);
        }
        Ok(())
    }

    async fn get(&self, id: i64) -> StoreResult<Option<Vendor>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn count_incomplete(&self) -> StoreResult<u64> {
        let records = self.records.read().await;
        Ok(records.values().filter(|v| !v.is_complete()).count() as u64)
    }

    async fn incomplete_ids(&self) -> StoreResult<Vec<i64>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|v| !v.is_complete())
            .map(|v| v.id)
            .collect())
    }

    async fn complete_ids(&self) -> StoreResult<Vec<i64>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|v| v.is_complete())
            .map(|v| v.id)
            .collect())
    }

    async fn fetch_by_ids(&self, ids: &[i64]) -> StoreResult<Vec<Vendor>> {
        let records = self.records.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| records.get(id).cloned())
            .collect())
    }

    async fn mark_all_stale(&self) -> StoreResult<()> {
        let mut records = self.records.write().await;
        for vendor in records.values_mut() {
            vendor.stale = true;
        }
        Ok(())
    }

    async fn delete_stale(&self) -> StoreResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, vendor| !vendor.stale);
        Ok((before - records.len()) as u64)
    }

    async fn find_in_box(&self, bbox: &BoundingBox) -> StoreResult<Vec<Vendor>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|v| bbox.contains(v.latitude, v.longitude))
            .cloned()
            .collect())
    }
}
