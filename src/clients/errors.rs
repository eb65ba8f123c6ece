//! Transport-level error types.
//!
//! These errors describe what went wrong during the exchange itself. The
//! REST layer treats them as opaque and propagates them unchanged, with one
//! exception: a 422 [`HttpResponseError`] carrying a field-error envelope can
//! be converted into structured validation errors via
//! [`Resource::catch_validation`](crate::rest::Resource::catch_validation).
//!
//! # Example
//!
//! ```rust,ignore
//! match transport.send(&url, descriptor).await {
//!     Ok(response) => println!("Body: {}", response.body),
//!     Err(TransportError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(TransportError::InvalidRequest(e)) => println!("Invalid request: {e}"),
//!     Err(TransportError::Network(e)) => println!("Network error: {e}"),
//! }
//! ```

use serde_json::Value;
use thiserror::Error;

/// Error returned when an exchange completes with a non-2xx status.
///
/// The decoded body is kept so that callers can recover structured payloads
/// such as validation envelopes.
///
/// # Example
///
/// ```rust
/// use rest_mapper::clients::HttpResponseError;
/// use serde_json::json;
///
/// let error = HttpResponseError {
///     code: 404,
///     body: json!({"error": "Not found"}),
///     message: "[GET https://api.example.com/users/1] 404 {\"error\":\"Not found\"}".to_string(),
///     error_reference: None,
/// };
/// assert!(error.to_string().contains("404"));
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The decoded response body.
    pub body: Value,
    /// Human-readable summary of the failure.
    pub message: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when a descriptor cannot be turned into a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    /// A `:name` placeholder had no matching path parameter.
    #[error("Unresolved path parameter ':{name}' in '{url}'.")]
    UnresolvedPathParam {
        /// The placeholder name.
        name: String,
        /// The URL after substitution.
        url: String,
    },
}

/// Unified error type for transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The exchange completed with a non-2xx status code.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// The descriptor could not be turned into a request.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl TransportError {
    /// Returns the HTTP status code for response errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            _ => None,
        }
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TransportError>();
};
