//! Request shaping and response parsing for REST resources.
//!
//! This module turns loosely typed caller intent into canonical request
//! descriptors, and decoded response envelopes back into typed models:
//!
//! - **[`FieldMap`]** and [`map_fields`]: wire ↔ local field-name translation
//! - **[`NestedResource`]** and [`map_nested`]: delegation of relation fields
//!   to other resources
//! - **[`RequestFormatter`]**: [`RequestIntent`] → [`RequestDescriptor`](crate::clients::RequestDescriptor)
//! - **[`ResponseParser`]**: envelope → [`Entity`], [`Collection`] plus
//!   [`Pagination`], or [`ValidationErrors`]
//! - **[`Model`]** and [`ModelFill`]: the model lifecycle and typed field
//!   coercions
//! - **[`Resource`]**: the orchestrator composing all of the above around a
//!   [`Transport`](crate::clients::Transport)
//!
//! Formatting never fails; anomalies are reported as [`Diagnostics`].
//! Parsing failures abort the call with a [`ResourceError`].
//!
//! # Example
//!
//! ```rust
//! use rest_mapper::rest::{FieldMap, Fields, MapDirection, Resource, ResourceConfig};
//! use serde_json::json;
//!
//! let records: Resource<Fields> = Resource::new(
//!     ResourceConfig::builder()
//!         .base_url("/records")
//!         .field_map(FieldMap::from([("a", "x")]))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let raw = json!({"a": 1, "b": 2});
//! let model = records.make_model(raw.as_object().unwrap()).unwrap();
//! assert_eq!(model.get("x"), Some(&json!(1)));
//!
//! let wire = records.make_raw_entity(&model).unwrap();
//! assert_eq!(wire.get("a"), Some(&json!(1)));
//! ```

mod diagnostics;
mod errors;
mod field_map;
mod formatter;
mod intent;
mod model;
mod parser;
mod resource;
mod response;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use errors::{ModelError, ResourceError};
pub use field_map::{map_fields, map_nested, FieldMap, MapDirection, NestedFields, NestedResource};
pub use formatter::{FormattedRequest, RequestFormatter};
pub use intent::{HeadersInput, MethodInput, RequestIntent, SearchInput};
pub use model::{Fields, Model, ModelFill};
pub use parser::ResponseParser;
pub use resource::{
    catch_status, BeforeSend, ModelFactory, PreparedRequest, Resource, ResourceConfig,
    ResourceConfigBuilder,
};
pub use response::{Collection, Entity, Pagination, PaginationField, ValidationErrors};
