//! Shared test fixtures for the pipeline modules
//!
//! Provides a scripted in-process stand-in for the upstream vendor API so the
//! stager, enricher, and refresh coordinator can be exercised without network
//! access, plus small record builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::client::VendorApi;
use super::models::{Details, Vendor};
use crate::errors::{FetchError, FetchResult};

/// Build a minimal vendor record at a fixed location
pub(crate) fn sample_vendor(id: i64) -> Vendor {
    Vendor {
        id,
        title: format!("vendor-{id}"),
        latitude: 35.7,
        longitude: 51.4,
        max_offer_percent: 10.0,
        distance: 0.0,
        is_liked: false,
        super_type: None,
        vendor_tag: Vec::new(),
        vendor_banner: Vec::new(),
        price_range: 0,
        profile_picture_url: None,
        user_name: None,
        area: None,
        total_reviews: 0,
        rating: 0.0,
        has_new_tag: false,
        navigation_json: None,
        vendor_ramadan_status: 0,
        details: None,
        stale: false,
    }
}

/// Build a vendor at an explicit position with an explicit offer
pub(crate) fn vendor_at(id: i64, latitude: f64, longitude: f64, offer: f64) -> Vendor {
    Vendor {
        latitude,
        longitude,
        max_offer_percent: offer,
        ..sample_vendor(id)
    }
}

/// Build a detail payload for a vendor
pub(crate) fn sample_details(id: i64) -> Details {
    let value = json!({
        "vendor": { "id": id },
        "offer": { "upperLimit": 200_000, "lowerLimit": 50_000 },
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Scripted upstream API double
///
/// Pages are served from a fixed script; detail calls succeed once the
/// per-vendor failure budget is spent. Tracks peak in-flight detail calls so
/// tests can assert the concurrency bound.
pub(crate) struct ScriptedApi {
    pages: Vec<Vec<Vendor>>,
    /// Number of times each vendor's detail call fails before succeeding.
    /// `u32::MAX` means the vendor never succeeds.
    failures: Mutex<HashMap<i64, u32>>,
    fail_page: Option<u32>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl ScriptedApi {
    /// An API serving the given vendors across listing pages, all detail
    /// calls succeeding immediately
    pub(crate) fn new(pages: Vec<Vec<Vendor>>) -> Self {
        Self {
            pages,
            failures: Mutex::new(HashMap::new()),
            fail_page: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
        }
    }

    /// Serve all vendors from a single listing page
    pub(crate) fn single_page(vendors: Vec<Vendor>) -> Self {
        Self::new(vec![vendors])
    }

    /// Fail the detail call for `id` the first `count` times
    pub(crate) fn fail_details(self, id: i64, count: u32) -> Self {
        self.failures.lock().unwrap().insert(id, count);
        self
    }

    /// Fail the detail call for `id` on every attempt
    pub(crate) fn always_fail_details(self, id: i64) -> Self {
        self.fail_details(id, u32::MAX)
    }

    /// Return a hard error when the given listing page is requested
    pub(crate) fn fail_page(mut self, page: u32) -> Self {
        self.fail_page = Some(page);
        self
    }

    /// Highest number of simultaneously in-flight detail calls observed
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Total detail calls made
    pub(crate) fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VendorApi for ScriptedApi {
    async fn fetch_page(&self, page_number: u32, _page_size: u32) -> FetchResult<Vec<Vendor>> {
        if self.fail_page == Some(page_number) {
            return Err(FetchError::PageStatus {
                page: page_number,
                status: 500,
            });
        }
        // Pages are 1-indexed; anything past the script is end-of-data
        Ok(self
            .pages
            .get((page_number - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_details(&self, id: i64) -> FetchResult<Details> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        self.detail_calls.fetch_add(1, Ordering::SeqCst);

        // Hold the slot briefly so overlapping tasks are observable
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let result = {
            let mut failures = self.failures.lock().unwrap();
            match failures.get_mut(&id) {
                Some(0) | None => Ok(sample_details(id)),
                Some(remaining) if *remaining == u32::MAX => {
                    Err(FetchError::DetailStatus { id, status: 503 })
                }
                Some(remaining) => {
                    *remaining -= 1;
                    Err(FetchError::DetailStatus { id, status: 503 })
                }
            }
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
