//! Canonical request types handed to a [`Transport`](crate::clients::Transport).
//!
//! A [`RequestDescriptor`] is the fully-resolved form of an outbound request:
//! verb, headers, query, body and path parameters. It is built fresh for every
//! call by the [`RequestFormatter`](crate::rest::RequestFormatter) and consumed
//! by the transport.

use std::fmt;

use serde_json::{Map, Value};

use crate::clients::params::{HeaderCollection, QueryParams};

/// HTTP verbs understood by the formatter and transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP OPTIONS method.
    Options,
    /// HTTP HEAD method.
    Head,
}

impl HttpMethod {
    /// Every canonical verb.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Options,
        Self::Head,
    ];

    /// Returns the canonical variant name (e.g., `"Get"`).
    #[must_use]
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Patch => "Patch",
            Self::Delete => "Delete",
            Self::Options => "Options",
            Self::Head => "Head",
        }
    }

    /// Looks a verb up by its exact canonical variant name.
    ///
    /// ```rust
    /// use rest_mapper::HttpMethod;
    ///
    /// assert_eq!(HttpMethod::from_variant_name("Patch"), Some(HttpMethod::Patch));
    /// assert_eq!(HttpMethod::from_variant_name("PATCH"), None);
    /// ```
    #[must_use]
    pub fn from_variant_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.variant_name() == name)
    }

    /// Returns `true` if requests with this verb normally carry a body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        !matches!(self, Self::Get | Self::Head | Self::Options)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
            Self::Options => write!(f, "OPTIONS"),
            Self::Head => write!(f, "HEAD"),
        }
    }
}

/// The canonical outbound request consumed by a transport.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    /// The resolved verb.
    pub method: HttpMethod,
    /// Request headers.
    pub headers: HeaderCollection,
    /// Query-string parameters.
    pub search: QueryParams,
    /// The request body, passed through unchanged from the intent.
    pub body: Option<Value>,
    /// Values substituted into `:name` placeholders of the URL.
    pub params: Map<String, Value>,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            headers: HeaderCollection::new(),
            search: QueryParams::new(),
            body: None,
            params: Map::new(),
        }
    }
}

/// Replaces `:name` placeholders in `url` with values from `params`.
///
/// A placeholder only matches when the character following the name is not
/// part of an identifier, so `:id` does not touch `:idx`. String values are
/// inserted verbatim; other values use their JSON text.
///
/// ```rust
/// use rest_mapper::clients::substitute_path_params;
/// use serde_json::json;
///
/// let params = json!({"articleId": 5, "id": "3"});
/// let url = substitute_path_params(
///     "/articles/:articleId/comments/:id",
///     params.as_object().unwrap(),
/// );
/// assert_eq!(url, "/articles/5/comments/3");
/// ```
#[must_use]
pub fn substitute_path_params(url: &str, params: &Map<String, Value>) -> String {
    let mut result = url.to_string();

    for (name, value) in params {
        let replacement = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let placeholder = format!(":{name}");
        let mut output = String::with_capacity(result.len());
        let mut rest = result.as_str();

        while let Some(index) = rest.find(&placeholder) {
            let after = &rest[index + placeholder.len()..];
            let is_boundary = after
                .chars()
                .next()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_'));

            output.push_str(&rest[..index]);
            if is_boundary {
                output.push_str(&replacement);
            } else {
                output.push_str(&placeholder);
            }
            rest = after;
        }
        output.push_str(rest);
        result = output;
    }

    result
}

/// Returns the names of `:name` placeholders left in the path part of `url`.
#[must_use]
pub fn unresolved_path_params(url: &str) -> Vec<String> {
    let path = url
        .find("://")
        .map_or(url, |i| url[i + 3..].find('/').map_or("", |p| &url[i + 3 + p..]));
    let path = path.split(['?', '#']).next().unwrap_or_default();

    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}
