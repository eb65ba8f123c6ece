//! Caller-supplied request intent.
//!
//! A [`RequestIntent`] is the loosely typed description of a call, before
//! the [`RequestFormatter`](crate::rest::RequestFormatter) normalizes it into
//! a [`RequestDescriptor`](crate::clients::RequestDescriptor). Most inputs
//! accept several shapes (a verb or a method name, a plain map or a
//! collection, a query string) through `From` conversions.
//!
//! # Example
//!
//! ```rust
//! use rest_mapper::rest::{Pagination, RequestIntent};
//!
//! let intent = RequestIntent::new()
//!     .method("post")
//!     .search("active=true")
//!     .token("secret")
//!     .pagination(Pagination { page: Some(2), ..Pagination::default() })
//!     .expand(["city"]);
//!
//! assert!(intent.token.is_some());
//! ```

use std::collections::HashMap;

use serde_json::Value;

use crate::clients::{HeaderCollection, HttpMethod, QueryParams};
use crate::rest::{Fields, Pagination};

/// A request method, either canonical or by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodInput {
    /// A canonical verb, used as-is.
    Verb(HttpMethod),
    /// A method name such as `"post"` or `"Delete"`.
    Name(String),
}

impl From<HttpMethod> for MethodInput {
    fn from(method: HttpMethod) -> Self {
        Self::Verb(method)
    }
}

impl From<&str> for MethodInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for MethodInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Request headers, as a plain map or a ready collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeadersInput {
    /// One value per name.
    Map(HashMap<String, String>),
    /// Ordered, possibly repeated values.
    Collection(HeaderCollection),
}

impl From<HashMap<String, String>> for HeadersInput {
    fn from(map: HashMap<String, String>) -> Self {
        Self::Map(map)
    }
}

impl From<HeaderCollection> for HeadersInput {
    fn from(headers: HeaderCollection) -> Self {
        Self::Collection(headers)
    }
}

impl From<HeadersInput> for HeaderCollection {
    fn from(input: HeadersInput) -> Self {
        match input {
            HeadersInput::Map(map) => map.into(),
            HeadersInput::Collection(headers) => headers,
        }
    }
}

/// Query parameters in one of three shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchInput {
    /// A plain map; every entry is appended.
    Map(Fields),
    /// A pre-encoded query string, with or without the leading `?`.
    Query(String),
    /// A ready collection, used as-is.
    Params(QueryParams),
}

impl From<Fields> for SearchInput {
    fn from(map: Fields) -> Self {
        Self::Map(map)
    }
}

impl From<&str> for SearchInput {
    fn from(query: &str) -> Self {
        Self::Query(query.to_string())
    }
}

impl From<String> for SearchInput {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<QueryParams> for SearchInput {
    fn from(params: QueryParams) -> Self {
        Self::Params(params)
    }
}

impl From<SearchInput> for QueryParams {
    /// Strings are appended as-is and other scalars as their JSON text.
    /// Sequences append one value per element; `null` entries are skipped.
    fn from(input: SearchInput) -> Self {
        match input {
            SearchInput::Map(map) => {
                let mut params = Self::new();
                for (name, value) in map {
                    append_value(&mut params, &name, value);
                }
                params
            }
            SearchInput::Query(query) => Self::parse(&query),
            SearchInput::Params(params) => params,
        }
    }
}

fn append_value(params: &mut QueryParams, name: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => params.append(name, s),
        Value::Array(items) => {
            for item in items {
                append_value(params, name, item);
            }
        }
        other => params.append(name, other.to_string()),
    }
}

/// Everything a caller may say about one request.
///
/// Every field is optional; [`RequestIntent::default`] describes a plain GET.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestIntent {
    /// Request method; GET when absent.
    pub method: Option<MethodInput>,
    /// Request headers.
    pub headers: Option<HeadersInput>,
    /// Query parameters.
    pub search: Option<SearchInput>,
    /// Request body, passed through untouched.
    pub body: Option<Value>,
    /// Path parameters, passed through to the transport.
    pub params: Fields,
    /// Bearer token for the `Authorization` header.
    pub token: Option<String>,
    /// Requested page markers.
    pub pagination: Option<Pagination>,
    /// Local names of extra fields to include in the response.
    pub expand: Vec<String>,
    /// Local names of the only fields to include in the response.
    pub fields: Vec<String>,
}

impl RequestIntent {
    /// Creates an empty intent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: impl Into<MethodInput>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets all headers.
    #[must_use]
    pub fn headers(mut self, headers: impl Into<HeadersInput>) -> Self {
        self.headers = Some(headers.into());
        self
    }

    /// Appends one header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: HeaderCollection = self.headers.take().map(Into::into).unwrap_or_default();
        headers.append(name, value);
        self.headers = Some(HeadersInput::Collection(headers));
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn search(mut self, search: impl Into<SearchInput>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets one path parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the requested page markers.
    #[must_use]
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// Sets the fields to expand.
    #[must_use]
    pub fn expand<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expand = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fields to select.
    #[must_use]
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = names.into_iter().map(Into::into).collect();
        self
    }
}
