//! # Error Handling Module
//!
//! Defines the error taxonomy for the gateway using the `thiserror` crate and
//! maps each error category to the HTTP status code clients should see.
//!
//! The upstream-facing categories deliberately distinguish three failure modes:
//! - `UpstreamUnreachable`: the metadata service could not be reached at all
//! - `UpstreamMalformed`: the service answered, but the body was not JSON
//! - `InvalidUpstreamShape`: the body was JSON but violated the expected
//!   structure (e.g. `results` was not an array)
//!
//! The first two are transport-level problems and surface as 500; the third
//! signals a broken upstream contract and surfaces as 502 so callers can tell
//! the difference.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main result type used throughout the gateway
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Error types for the gateway
///
/// Each variant represents a different category of error. The `#[error("...")]`
/// attribute from `thiserror` implements `Display` with the given message.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration-related errors (missing API key, bad port, etc.)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The metadata service could not be reached (connect/transport failure)
    #[error("Upstream unreachable: {message}")]
    UpstreamUnreachable { message: String },

    /// The metadata service responded with a body that is not parseable JSON
    #[error("Upstream response malformed: {message}")]
    UpstreamMalformed { message: String },

    /// The upstream payload parsed but a required field has the wrong shape
    #[error("Invalid upstream shape: field `{field}` expected {expected}, found {found}")]
    InvalidUpstreamShape {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// The image CDN could not be reached
    #[error("Image upstream error: {message}")]
    ImageUpstream { message: String },

    /// Favorites persistence failed (I/O error or malformed stored JSON)
    #[error("Favorites storage error: {message}")]
    FavoritesStorage { message: String },

    /// I/O errors (server binding, file operations)
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl GatewayError {
    /// Create a configuration error with a custom message
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an upstream-unreachable error
    pub fn unreachable<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnreachable {
            message: message.into(),
        }
    }

    /// Create a malformed-upstream-body error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::UpstreamMalformed {
            message: message.into(),
        }
    }

    /// Create a shape-violation error for a required field
    pub fn shape<S: Into<String>, F: Into<String>>(
        field: S,
        expected: &'static str,
        found: F,
    ) -> Self {
        Self::InvalidUpstreamShape {
            field: field.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create an image-CDN error
    pub fn image_upstream<S: Into<String>>(message: S) -> Self {
        Self::ImageUpstream {
            message: message.into(),
        }
    }

    /// Create a favorites storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::FavoritesStorage {
            message: message.into(),
        }
    }

    /// Get the appropriate HTTP status code for this error
    ///
    /// Transport and parse failures against the metadata service map to 500,
    /// matching the reference behavior; contract violations (wrong payload
    /// shape, unreachable image CDN) map to 502.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamUnreachable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamMalformed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidUpstreamShape { .. } => StatusCode::BAD_GATEWAY,
            Self::ImageUpstream { .. } => StatusCode::BAD_GATEWAY,
            Self::FavoritesStorage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be retried
    ///
    /// Transport failures are transient; contract violations and configuration
    /// problems are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnreachable { .. } | Self::ImageUpstream { .. } | Self::Io { .. }
        )
    }

    /// Get a string representation of the error type for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration_error",
            Self::UpstreamUnreachable { .. } => "upstream_unreachable",
            Self::UpstreamMalformed { .. } => "upstream_malformed",
            Self::InvalidUpstreamShape { .. } => "invalid_upstream_shape",
            Self::ImageUpstream { .. } => "image_upstream_error",
            Self::FavoritesStorage { .. } => "favorites_storage_error",
            Self::Io { .. } => "io_error",
        }
    }
}

/// Implement conversion from std::io::Error
impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Implement conversion from reqwest::Error, classifying the failure mode
///
/// Decode failures mean the upstream answered with something that is not
/// JSON; everything else (connect, timeout, request build) means the upstream
/// was effectively unreachable.
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::UpstreamMalformed {
                message: err.to_string(),
            }
        } else {
            Self::UpstreamUnreachable {
                message: err.to_string(),
            }
        }
    }
}

/// Convert errors into HTTP responses with a structured JSON error body
///
/// This lets handlers return `GatewayResult<T>` and have Axum produce the
/// right status code and body automatically. Errors never crash a request
/// task; they always become a response.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
                "type": self.error_type(),
                "retryable": self.is_retryable(),
            }
        });

        (status, Json(error_response)).into_response()
    }
}
