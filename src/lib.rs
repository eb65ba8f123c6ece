//! # rest-mapper
//!
//! A data-shaping layer for REST clients: it turns loosely typed request
//! intent into canonical request descriptors, and raw response envelopes
//! back into typed models, pagination and validation errors.
//!
//! ## Overview
//!
//! This crate provides:
//! - Bidirectional field-name mapping between wire and local names, with
//!   delegation of relation fields to nested resources
//! - Request normalization (method, headers, query, pagination, field
//!   selection) via [`rest::RequestFormatter`]
//! - Envelope parsing into [`rest::Entity`], [`rest::Collection`] and
//!   [`rest::ValidationErrors`] via [`rest::ResponseParser`]
//! - A generic [`rest::Resource`] composing the above, with default
//!   `view`/`list`/`create`/`update`/`delete` operations
//! - A pluggable async [`Transport`] boundary and a `reqwest`-backed
//!   [`HttpTransport`]
//!
//! ## Quick Start
//!
//! ```rust
//! use rest_mapper::rest::{FieldMap, Fields, RequestIntent, Resource, ResourceConfig};
//!
//! let users: Resource<Fields> = Resource::new(
//!     ResourceConfig::builder()
//!         .base_url("/users")
//!         .field_map(FieldMap::from([("first_name", "firstName")]))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let prepared = users.prepare(
//!     RequestIntent::new().method("get").fields(["firstName"]).token("secret"),
//!     "/42",
//!     true,
//! );
//!
//! assert_eq!(prepared.url, "/users/42");
//! assert_eq!(prepared.descriptor.search.get("fields"), Some("first_name"));
//! assert_eq!(prepared.descriptor.headers.get("Authorization"), Some("Bearer secret"));
//! ```
//!
//! ## Talking to a server
//!
//! ```rust,ignore
//! use rest_mapper::{BaseUrl, HttpTransport, TransportConfig};
//! use rest_mapper::rest::{RequestIntent, ResourceError};
//!
//! let transport = HttpTransport::new(
//!     TransportConfig::builder()
//!         .base_uri(BaseUrl::new("https://api.example.com")?)
//!         .build()?,
//! )?;
//!
//! match users.create(&transport, &user, RequestIntent::new()).await {
//!     Ok(created) => println!("Created {:?}", created.data()),
//!     Err(ResourceError::ValidationFailed(errors)) => {
//!         for (field, message) in errors.iter() {
//!             println!("{field}: {message}");
//!         }
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No I/O in the core**: formatting and parsing are pure; the only
//!   suspension point is the [`Transport`] exchange
//! - **Immutable configuration**: a resource's field map, nested resources
//!   and model factory are fixed at construction and shared by every call
//! - **Non-fatal diagnostics**: formatting anomalies degrade to safe
//!   defaults and are reported as [`rest::Diagnostics`]
//! - **Thread-safe**: all public types are `Send + Sync`

pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, TransportConfig, TransportConfigBuilder};
pub use error::ConfigError;

// Re-export transport types
pub use clients::{
    HeaderCollection, HttpMethod, HttpResponse, HttpResponseError, HttpTransport,
    InvalidRequestError, QueryParams, RequestDescriptor, Transport, TransportError,
};
