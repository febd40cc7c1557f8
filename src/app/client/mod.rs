//! HTTP client for the upstream vendor API
//!
//! This module provides the client used by the refresh pipeline to talk to
//! the vendor catalog's two endpoints: the paginated listing and the
//! per-vendor detail call.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core GET operation with rate limiting and backoff
//!
//! Neither endpoint is retried at this layer beyond uniform transport-level
//! backoff; page retry/stop policy belongs to the stager and detail retry
//! policy to the enricher.

use async_trait::async_trait;
use url::Url;

use crate::app::models::{Details, Vendor, VendorPage};
use crate::constants::api;
use crate::errors::{FetchError, FetchResult};

pub mod config;
pub mod http;

pub use config::ClientConfig;

use http::HttpHandler;

/// Upstream vendor API surface consumed by the pipeline
///
/// The stager drives `fetch_page`; the enricher drives `fetch_details`.
/// Abstracted as a trait so the pipeline can be exercised against a scripted
/// double in tests.
#[async_trait]
pub trait VendorApi: Send + Sync {
    /// Fetch one listing page of vendors
    ///
    /// Pages are 1-indexed. An empty item list on a successful response
    /// signals end-of-data. Non-success status and decode failures are hard
    /// errors carrying the page number.
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> FetchResult<Vec<Vendor>>;

    /// Fetch the opaque detail payload for one vendor
    ///
    /// Non-success status and decode failures are errors carrying the vendor
    /// identifier for log correlation.
    async fn fetch_details(&self, id: i64) -> FetchResult<Details>;
}

/// HTTP client for the vendor catalog API
///
/// Handles credential headers, rate limiting, and transport-level retry
/// through its [`HttpHandler`].
#[derive(Debug)]
pub struct VendorApiClient {
    http_handler: HttpHandler,
    base_url: Url,
}

impl VendorApiClient {
    /// Creates a new client with default configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if HTTP client creation fails
    pub fn new(jwt_token: impl Into<String>) -> FetchResult<Self> {
        Self::new_with_config(jwt_token, ClientConfig::default())
    }

    /// Creates a new client with custom configuration
    ///
    /// # Arguments
    ///
    /// * `jwt_token` - Bearer-style credential attached to every request
    /// * `config` - Client configuration settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if HTTP client creation fails
    pub fn new_with_config(jwt_token: impl Into<String>, config: ClientConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, jwt_token.into(), config.rate_limit_rps)?;
        let base_url = Url::parse(api::BASE_URL).expect("Base URL should be valid");

        Ok(Self {
            http_handler,
            base_url,
        })
    }

    /// Build the listing endpoint URL for a page
    fn listing_url(&self, page_number: u32, page_size: u32) -> FetchResult<Url> {
        let mut url = self
            .base_url
            .join(api::LISTING_PATH)
            .map_err(|e| FetchError::InvalidUrl { url: e.to_string() })?;
        url.query_pairs_mut()
            .append_pair("pageNumber", &page_number.to_string())
            .append_pair("pageSize", &page_size.to_string());
        Ok(url)
    }

    /// Build the detail endpoint URL for a vendor
    fn detail_url(&self, id: i64) -> FetchResult<Url> {
        let mut url = self
            .base_url
            .join(api::DETAIL_PATH)
            .map_err(|e| FetchError::InvalidUrl { url: e.to_string() })?;
        url.query_pairs_mut()
            .append_pair("vendorID", &id.to_string());
        Ok(url)
    }
}

#[async_trait]
impl VendorApi for VendorApiClient {
    async fn fetch_page(&self, page_number: u32, page_size: u32) -> FetchResult<Vec<Vendor>> {
        let url = self.listing_url(page_number, page_size)?;
        let response = self.http_handler.get_response(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::PageStatus {
                page: page_number,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let page: VendorPage = serde_json::from_str(&body).map_err(|source| {
            FetchError::PageDecode {
                page: page_number,
                source,
            }
        })?;

        Ok(page.into_items())
    }

    async fn fetch_details(&self, id: i64) -> FetchResult<Details> {
        let url = self.detail_url(id)?;
        let response = self.http_handler.get_response(&url).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::DetailStatus {
                id,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| FetchError::DetailDecode { id, source })
    }
}
