//! Error types for model construction and resource operations.
//!
//! # Error Handling
//!
//! - [`ResourceError::MalformedResponseBody`]: the decoded body is not an
//!   envelope object (or is a bare array at the root). Fatal for the call.
//! - [`ResourceError::ValidationFailed`]: a 422 field-error envelope,
//!   produced only by [`Resource::catch_validation`](crate::rest::Resource::catch_validation).
//! - [`ResourceError::Model`]: a model factory or coercion rejected the data.
//! - [`ResourceError::Transport`]: anything raised by the exchange, untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! match users.create(&transport, &user, RequestIntent::default()).await {
//!     Ok(entity) => println!("Created {:?}", entity.data()),
//!     Err(ResourceError::ValidationFailed(errors)) => {
//!         for (field, message) in errors.iter() {
//!             println!("{field}: {message}");
//!         }
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::TransportError;
use crate::rest::ValidationErrors;

/// Error raised while building a model from raw fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A field held a value that cannot be coerced to the expected type.
    #[error("Field '{field}' cannot be read as {expected}: found {found}")]
    InvalidField {
        /// The field name.
        field: String,
        /// The expected type (e.g., "number").
        expected: &'static str,
        /// The offending value as JSON text.
        found: String,
    },

    /// A model was built from something other than a JSON object.
    #[error("Expected an object to build a model, found {found}")]
    NotAnObject {
        /// The offending value as JSON text.
        found: String,
    },
}

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The decoded response body is not a well-formed envelope.
    #[error("Malformed response body: {reason}")]
    MalformedResponseBody {
        /// What was wrong with the body.
        reason: String,
    },

    /// The server rejected the request with field-level validation errors.
    #[error("Validation failed: {0:?}")]
    ValidationFailed(ValidationErrors),

    /// A model could not be built from the response data.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The exchange itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ResourceError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedResponseBody {
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code for transport response errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
    assert_send_sync::<ModelError>();
};
