//! Configuration for the bundled HTTP transport.
//!
//! Resource-level configuration (field maps, nested resources, query
//! parameter names) lives with the resource itself in
//! [`ResourceConfig`](crate::rest::ResourceConfig). This module holds the
//! settings shared by every exchange the [`HttpTransport`](crate::clients::HttpTransport)
//! performs.
//!
//! # Example
//!
//! ```rust
//! use rest_mapper::{BaseUrl, TransportConfig};
//!
//! let config = TransportConfig::builder()
//!     .base_uri(BaseUrl::new("https://api.example.com").unwrap())
//!     .user_agent_prefix("MyApp/1.0")
//!     .enable_request_logging(true)
//!     .build()
//!     .unwrap();
//!
//! assert!(config.request_logging());
//! assert!(config.error_logging());
//! ```

mod newtypes;

pub use newtypes::BaseUrl;

use crate::error::ConfigError;

/// Settings for an [`HttpTransport`](crate::clients::HttpTransport).
#[derive(Clone, Debug)]
pub struct TransportConfig {
    base_uri: BaseUrl,
    user_agent_prefix: Option<String>,
    enable_request_logging: bool,
    enable_response_logging: bool,
    enable_error_logging: bool,
}

impl TransportConfig {
    /// Creates a new builder for constructing a `TransportConfig`.
    #[must_use]
    pub fn builder() -> TransportConfigBuilder {
        TransportConfigBuilder::new()
    }

    /// Returns the base URI relative request URLs are joined onto.
    #[must_use]
    pub const fn base_uri(&self) -> &BaseUrl {
        &self.base_uri
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Whether outgoing requests are logged.
    #[must_use]
    pub const fn request_logging(&self) -> bool {
        self.enable_request_logging
    }

    /// Whether successful responses are logged.
    #[must_use]
    pub const fn response_logging(&self) -> bool {
        self.enable_response_logging
    }

    /// Whether failed exchanges are logged.
    #[must_use]
    pub const fn error_logging(&self) -> bool {
        self.enable_error_logging
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TransportConfig>();
};

/// Builder for [`TransportConfig`].
///
/// Only `base_uri` is required. Request and response logging default to
/// off, error logging defaults to on.
#[derive(Debug, Default)]
pub struct TransportConfigBuilder {
    base_uri: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    enable_request_logging: Option<bool>,
    enable_response_logging: Option<bool>,
    enable_error_logging: Option<bool>,
}

impl TransportConfigBuilder {
    /// Creates a new builder with all fields unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URI (required).
    #[must_use]
    pub fn base_uri(mut self, base_uri: BaseUrl) -> Self {
        self.base_uri = Some(base_uri);
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables request logging.
    #[must_use]
    pub const fn enable_request_logging(mut self, enabled: bool) -> Self {
        self.enable_request_logging = Some(enabled);
        self
    }

    /// Enables or disables logging of successful responses.
    #[must_use]
    pub const fn enable_response_logging(mut self, enabled: bool) -> Self {
        self.enable_response_logging = Some(enabled);
        self
    }

    /// Enables or disables error logging.
    #[must_use]
    pub const fn enable_error_logging(mut self, enabled: bool) -> Self {
        self.enable_error_logging = Some(enabled);
        self
    }

    /// Builds the [`TransportConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_uri` is not set.
    pub fn build(self) -> Result<TransportConfig, ConfigError> {
        let base_uri = self
            .base_uri
            .ok_or(ConfigError::MissingRequiredField { field: "base_uri" })?;

        Ok(TransportConfig {
            base_uri,
            user_agent_prefix: self.user_agent_prefix,
            enable_request_logging: self.enable_request_logging.unwrap_or(false),
            enable_response_logging: self.enable_response_logging.unwrap_or(false),
            enable_error_logging: self.enable_error_logging.unwrap_or(true),
        })
    }
}
