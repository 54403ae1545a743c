//! HTTP client utilities.
//!
//! Provides a shared HTTP client for all provider fetchers.

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::error::{AqError, Result};

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("aqstat/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AqError::Network(e.to_string()))
}

/// Map a reqwest transport error to a structured error.
#[must_use]
pub fn transport_error(err: &reqwest::Error, timeout: Duration) -> AqError {
    if err.is_timeout() {
        AqError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        AqError::Network(err.to_string())
    }
}
