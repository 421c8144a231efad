#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the accident aggregation API.
//!
//! Every endpoint takes the caller's [`FilterModel`] snapshot, encodes it
//! with [`accident_map_filter::query::encode`], adds the endpoint's own
//! scalars and decodes the JSON body into the types from
//! [`accident_map_api_models`]. Requests are sent once; retrying is left to
//! the user.
//!
//! [`FilterModel`]: accident_map_filter::FilterModel

pub mod client;
pub mod config;
mod http;

pub use client::ApiClient;
pub use config::ApiConfig;

use thiserror::Error;

/// Errors from aggregation API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        /// Endpoint path.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status text.
        message: String,
    },

    /// The body did not have the expected shape.
    #[error("Unexpected response from {endpoint}: {message}")]
    Shape {
        /// Endpoint path.
        endpoint: String,
        /// Description of the mismatch.
        message: String,
    },

    /// The client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}

impl ApiError {
    /// Text suitable for an error panel shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => {
                "The accident data service took too long to respond".to_string()
            }
            Self::Http(e) => format!("Could not reach the accident data service: {e}"),
            Self::Status { message, .. } => message.clone(),
            Self::Shape { .. } => "Invalid data format received from server".to_string(),
            Self::Config { message } => message.clone(),
        }
    }
}
