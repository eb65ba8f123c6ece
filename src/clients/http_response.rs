//! Raw responses returned by a [`Transport`](crate::clients::Transport).

use std::collections::HashMap;

use serde_json::Value;

/// A decoded response: status code, headers and JSON body.
///
/// The body is already decoded; deciding whether it is a well-formed
/// envelope is the job of the [`ResponseParser`](crate::rest::ResponseParser).
///
/// # Example
///
/// ```rust
/// use rest_mapper::clients::HttpResponse;
/// use serde_json::json;
///
/// let response = HttpResponse::new(200, HashMap::new(), json!({"data": []}));
/// assert!(response.is_ok());
/// # use std::collections::HashMap;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercase name.
    pub headers: HashMap<String, Vec<String>>,
    /// The decoded JSON body.
    pub body: Value,
}

impl HttpResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: Value) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, values)| (name.to_lowercase(), values))
            .collect();
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }
}
