//! End-to-end tests for the refresh pipeline
//!
//! Drives a full refresh through the public API against a scripted upstream
//! and verifies what the geographic query collaborator observes afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use vendor_mirror::app::{
    vendors_in_box, BoundingBox, Details, EnricherConfig, MemoryStore, RefreshConfig,
    RefreshCoordinator, Vendor, VendorApi, VendorStore,
};
use vendor_mirror::errors::{FetchError, FetchResult};

/// Scripted upstream: fixed listing pages, per-vendor detail failure budgets
struct FakeUpstream {
    pages: Vec<Vec<Vendor>>,
    failures: Mutex<HashMap<i64, u32>>,
}

impl FakeUpstream {
    fn new(pages: Vec<Vec<Vendor>>) -> Self {
        Self {
            pages,
            failures: Mutex::new(HashMap::new()),
        }
    }

    fn with_flaky_vendor(self, id: i64, failures: u32) -> Self {
        self.failures.lock().unwrap().insert(id, failures);
        self
    }
}

#[async_trait]
impl VendorApi for FakeUpstream {
    async fn fetch_page(&self, page_number: u32, _page_size: u32) -> FetchResult<Vec<Vendor>> {
        Ok(self
            .pages
            .get((page_number - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_details(&self, id: i64) -> FetchResult<Details> {
        let mut failures = self.failures.lock().unwrap();
        if let Some(remaining) = failures.get_mut(&id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(FetchError::DetailStatus { id, status: 502 });
            }
        }
        let value = json!({
            "offer": { "upperLimit": 100_000, "lowerLimit": 10_000 }
        });
        match value {
            serde_json::Value::Object(map) => Ok(map),
            _ => unreachable!(),
        }
    }
}

fn vendor(id: i64, latitude: f64, longitude: f64, offer: f64) -> Vendor {
    serde_json::from_value(json!({
        "id": id,
        "title": format!("vendor-{id}"),
        "latitude": latitude,
        "longitude": longitude,
        "maxOfferPercent": offer,
    }))
    .unwrap()
}

fn fast_configs() -> (RefreshConfig, EnricherConfig) {
    (
        RefreshConfig {
            pass_base_delay: Duration::from_millis(1),
            pass_max_delay: Duration::from_millis(5),
            ..Default::default()
        },
        EnricherConfig {
            batch_pause: Duration::from_millis(1),
            ..Default::default()
        },
    )
}

#[tokio::test]
async fn refreshed_snapshot_is_visible_to_the_box_query() {
    let upstream = Arc::new(
        FakeUpstream::new(vec![
            vec![vendor(1, 10.0, 10.0, 5.0), vendor(2, 50.0, 50.0, 0.0)],
            vec![vendor(3, 12.0, 12.0, 30.0)],
        ])
        .with_flaky_vendor(3, 2),
    );
    let staging = Arc::new(MemoryStore::new());
    let live = Arc::new(MemoryStore::new());

    let (refresh_config, enricher_config) = fast_configs();
    let coordinator = RefreshCoordinator::new(
        upstream,
        staging,
        live.clone(),
        refresh_config,
        enricher_config,
    );

    let summary = coordinator.refresh().await.unwrap();
    assert_eq!(summary.staged, 3);
    assert_eq!(summary.committed, 3);
    assert_eq!(summary.residual_incomplete, 0);
    // Vendor 3 needed two extra passes
    assert_eq!(summary.passes, 3);

    let bbox = BoundingBox {
        top_left_lat: 20.0,
        top_left_lng: 0.0,
        bottom_right_lat: 0.0,
        bottom_right_lng: 20.0,
    };
    let dtos = vendors_in_box(live.as_ref(), &bbox).await.unwrap();

    // Vendor 2 is outside the box and has a zero offer; 3 outranks 1
    let names: Vec<&str> = dtos.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["vendor-3", "vendor-1"]);
    assert_eq!(dtos[0].max, Some(100_000));
    assert_eq!(dtos[0].min, Some(10_000));
}

#[tokio::test]
async fn successive_refreshes_track_upstream_shrinkage() {
    let staging = Arc::new(MemoryStore::new());
    let live = Arc::new(MemoryStore::new());
    let (refresh_config, enricher_config) = fast_configs();

    // First snapshot carries vendors 1-3
    let first = Arc::new(FakeUpstream::new(vec![vec![
        vendor(1, 10.0, 10.0, 5.0),
        vendor(2, 11.0, 11.0, 5.0),
        vendor(3, 12.0, 12.0, 5.0),
    ]]));
    RefreshCoordinator::new(
        first,
        staging.clone(),
        live.clone(),
        refresh_config.clone(),
        enricher_config.clone(),
    )
    .refresh()
    .await
    .unwrap();
    assert_eq!(live.count().await.unwrap(), 3);

    // Upstream drops vendor 1 and adds vendor 4
    let second = Arc::new(FakeUpstream::new(vec![vec![
        vendor(2, 11.0, 11.0, 5.0),
        vendor(3, 12.0, 12.0, 5.0),
        vendor(4, 13.0, 13.0, 5.0),
    ]]));
    let summary = RefreshCoordinator::new(
        second,
        staging,
        live.clone(),
        refresh_config,
        enricher_config,
    )
    .refresh()
    .await
    .unwrap();

    assert_eq!(summary.swept, 1);
    assert!(live.get(1).await.unwrap().is_none());
    for id in 2..=4 {
        assert!(live.get(id).await.unwrap().unwrap().is_complete());
    }
}
