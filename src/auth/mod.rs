//! Credential handling for the vendor API
//!
//! The upstream requires a bearer-style JWT on every request. The token is
//! sourced from the environment (optionally via a `.env` file loaded at
//! startup); absence of the credential is a startup-time fatal error for the
//! refresh entry point.

pub mod credentials;

pub use credentials::{check_credentials, get_auth_status, load_jwt_token, AuthStatus};
