//! Application constants for Vendor Mirror
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for authentication
pub mod env {
    /// Environment variable name for the vendor API JWT credential
    pub const JWT: &str = "VENDOR_API_JWT";
}

/// Upstream vendor API endpoints and request headers
pub mod api {
    /// Vendor API base URL
    pub const BASE_URL: &str = "https://foodro-api.snappfood.ir";

    /// Paginated home-page listing endpoint path
    pub const LISTING_PATH: &str = "/CustomerVendor/GetHomePageList";

    /// Per-vendor detail endpoint path
    pub const DETAIL_PATH: &str = "/CustomerVendor/GetVendorDetail";

    /// Origin header required by the upstream API
    pub const ORIGIN: &str = "https://foodro.snappfood.ir";

    /// Referer header required by the upstream API
    pub const REFERER: &str = "https://foodro.snappfood.ir/";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests (the upstream rejects
    /// non-browser agents)
    pub const USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 32;
}

/// Rate limiting and transport retry configuration
pub mod limits {
    /// Default rate limit for upstream requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 20;

    /// Maximum transport-level retry attempts for a single request
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 500;
}

/// Refresh pipeline configuration defaults
pub mod refresh {
    use super::Duration;

    /// Listing page size requested from the upstream API
    pub const PAGE_SIZE: u32 = 20;

    /// Number of detail fetches grouped into one batch
    pub const DETAIL_BATCH_SIZE: usize = 30;

    /// Maximum simultaneously in-flight detail fetches
    pub const DETAIL_CONCURRENCY: usize = 30;

    /// Pause between detail batches to avoid bursting the upstream
    pub const BATCH_PAUSE: Duration = Duration::from_millis(100);

    /// Maximum enrichment passes before committing whatever completed
    pub const MAX_ENRICH_PASSES: u32 = 15;

    /// Base delay between enrichment passes
    pub const PASS_BASE_DELAY: Duration = Duration::from_secs(1);

    /// Cap on the delay between enrichment passes
    pub const PASS_MAX_DELAY: Duration = Duration::from_secs(60);

    /// Records copied from staging to live per commit chunk
    pub const COMMIT_CHUNK_SIZE: usize = 200;

    /// Overall wall-clock deadline for one refresh
    pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(30 * 60);

    /// Default interval between scheduled refreshes
    pub const RUN_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);
}

/// Document store collection names
pub mod store {
    /// Live collection read by query traffic
    pub const LIVE_COLLECTION: &str = "vendors";

    /// Staging collection owned by the in-flight refresh
    pub const STAGING_COLLECTION: &str = "temp_vendors";
}

// Re-export commonly used constants for convenience
pub use api::BASE_URL as API_BASE_URL;
pub use env::JWT as ENV_JWT;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::{DEFAULT_RATE_LIMIT_RPS, MAX_RETRIES, RETRY_BASE_DELAY_MS};
pub use refresh::{DETAIL_BATCH_SIZE, MAX_ENRICH_PASSES, PAGE_SIZE};
