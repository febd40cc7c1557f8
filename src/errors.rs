//! Error types for Vendor Mirror
//!
//! This module defines error types for all components of the application.
//! Errors carry enough context (vendor identifier, page number, refresh phase)
//! for the orchestrator to log and decide whether a failure is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Authentication and credential errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing JWT credential for the vendor API
    #[error("Missing vendor API credential. Set the VENDOR_API_JWT environment variable")]
    MissingCredentials,

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Upstream fetch errors for listing pages and vendor details
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP transport failure
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Listing page returned a non-success status
    #[error("Listing page {page} fetch failed: HTTP {status}")]
    PageStatus { page: u32, status: u16 },

    /// Listing page body could not be decoded
    #[error("Listing page {page} decode failed")]
    PageDecode {
        page: u32,
        #[source]
        source: serde_json::Error,
    },

    /// Detail call for a vendor returned a non-success status
    #[error("Detail fetch for vendor {id} failed: HTTP {status}")]
    DetailStatus { id: i64, status: u16 },

    /// Detail body for a vendor could not be decoded
    #[error("Detail decode for vendor {id} failed")]
    DetailDecode {
        id: i64,
        #[source]
        source: serde_json::Error,
    },

    /// Rate limit exceeded after transport-level retries
    #[error("Rate limit exceeded. Server responded with HTTP 429")]
    RateLimitExceeded,

    /// Server overloaded after transport-level retries
    #[error("Server overloaded. Server responded with HTTP 503")]
    ServerOverloaded,

    /// Maximum transport-level retries exceeded
    #[error("Maximum retry attempts ({max_retries}) exceeded for request")]
    MaxRetriesExceeded { max_retries: u32 },

    /// Invalid URL constructed for an upstream endpoint
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store backend rejected or failed an operation
    #[error("Store operation '{operation}' failed on collection '{collection}': {message}")]
    Backend {
        collection: String,
        operation: String,
        message: String,
    },
}

impl StoreError {
    /// Create a backend error with operation context
    pub fn backend(
        collection: impl Into<String>,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Backend {
            collection: collection.into(),
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Refresh pipeline errors, tagged with the phase that failed
#[derive(Error, Debug)]
pub enum RefreshError {
    /// Clearing the staging collection failed
    #[error("Clearing staging collection failed")]
    Clearing(#[source] StoreError),

    /// Staging aborted on a listing fetch failure
    #[error("Staging failed while fetching the vendor listing")]
    Staging(#[source] FetchError),

    /// Staging aborted on a store failure
    #[error("Staging failed while writing to the staging collection")]
    StagingStore(#[source] StoreError),

    /// Enrichment could not query residual incomplete records
    #[error("Enrichment failed while querying incomplete records")]
    Enriching(#[source] StoreError),

    /// Commit phase could not read the staged snapshot
    #[error("Commit failed while reading staged records")]
    Committing(#[source] StoreError),

    /// Sweep of stale live records failed
    #[error("Sweep of stale records failed (live store left stale-inclusive)")]
    Sweeping(#[source] StoreError),

    /// Overall refresh deadline expired
    #[error("Refresh deadline of {timeout_secs}s exceeded")]
    DeadlineExceeded { timeout_secs: u64 },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// I/O error reading configuration
    #[error("I/O error reading configuration")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Upstream fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Document store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Refresh pipeline error
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    ///
    /// Recoverable errors self-heal on a later enrichment pass or the next
    /// scheduled refresh; unrecoverable ones need operator attention.
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(FetchError::Http(_))
            | AppError::Fetch(FetchError::RateLimitExceeded)
            | AppError::Fetch(FetchError::ServerOverloaded)
            | AppError::Fetch(FetchError::DetailStatus { .. })
            | AppError::Fetch(FetchError::DetailDecode { .. })
            | AppError::Refresh(RefreshError::DeadlineExceeded { .. }) => true,

            AppError::Auth(_) | AppError::Config(_) => false,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Fetch(_) => "fetch",
            AppError::Store(_) => "store",
            AppError::Refresh(_) => "refresh",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Store result type alias
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Refresh result type alias
pub type RefreshResult<T> = std::result::Result<T, RefreshError>;
