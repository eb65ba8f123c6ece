//! Transport-side types: request descriptors, raw responses and the
//! [`Transport`] boundary.
//!
//! # Overview
//!
//! - [`RequestDescriptor`]: the canonical outbound request
//! - [`HttpMethod`]: the canonical verb set
//! - [`HeaderCollection`] and [`QueryParams`]: ordered multi-value collections
//! - [`HttpResponse`]: a decoded response (status, headers, JSON body)
//! - [`Transport`]: the async exchange boundary
//! - [`HttpTransport`]: a `reqwest`-backed [`Transport`]
//! - [`TransportError`]: failures raised by a transport
//!
//! The bundled transport never retries and never caches: one descriptor in,
//! one response out.

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod params;

pub use errors::{HttpResponseError, InvalidRequestError, TransportError};
pub use http_client::{HttpTransport, Transport, SDK_VERSION};
pub use http_request::{
    substitute_path_params, unresolved_path_params, HttpMethod, RequestDescriptor,
};
pub use http_response::HttpResponse;
pub use params::{HeaderCollection, QueryParams};
