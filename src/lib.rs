//! Vendor Mirror Library
//!
//! Mirrors a paginated third-party vendor catalog into a local document
//! store. The refresh pipeline stages the full listing, enriches every
//! vendor with a detail call under bounded concurrency, and replaces the
//! live snapshot with mark-and-sweep so readers never see a partially
//! populated dataset.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(PAGE_SIZE, 20);
        assert_eq!(MAX_ENRICH_PASSES, 15);
        assert_eq!(ENV_JWT, "VENDOR_API_JWT");
    }

    #[test]
    fn test_error_types() {
        let auth_error = errors::AuthError::MissingCredentials;
        let app_error = AppError::Auth(auth_error);

        assert_eq!(app_error.category(), "authentication");
        assert!(!app_error.is_recoverable());
    }
}
