//! The transport boundary and a `reqwest`-backed implementation.
//!
//! The REST layer never performs I/O itself: it hands a URL and a
//! [`RequestDescriptor`] to a [`Transport`] and awaits a single
//! [`HttpResponse`]. [`HttpTransport`] is the bundled implementation; tests
//! and embedders can supply their own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::clients::errors::{HttpResponseError, InvalidRequestError, TransportError};
use crate::clients::http_request::{
    substitute_path_params, unresolved_path_params, HttpMethod, RequestDescriptor,
};
use crate::clients::http_response::HttpResponse;
use crate::config::TransportConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Performs one network exchange per call.
///
/// Implementations own URL path-parameter substitution, default headers,
/// body decoding, cancellation and timeouts. A non-2xx status should be
/// reported as [`TransportError::Response`] with the decoded body attached.
#[allow(async_fn_in_trait)]
pub trait Transport: Send + Sync {
    /// Sends `descriptor` to `url` and returns the decoded response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the exchange fails or completes with
    /// a non-2xx status.
    async fn send(
        &self,
        url: &str,
        descriptor: RequestDescriptor,
    ) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport built on `reqwest`.
///
/// # Example
///
/// ```rust,ignore
/// use rest_mapper::{BaseUrl, HttpTransport, TransportConfig};
///
/// let config = TransportConfig::builder()
///     .base_uri(BaseUrl::new("https://api.example.com").unwrap())
///     .build()?;
/// let transport = HttpTransport::new(config)?;
/// ```
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: TransportConfig,
    default_headers: HashMap<String, String>,
    request_counter: AtomicU64,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpTransport>();
};

impl HttpTransport {
    /// Creates a transport from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the underlying client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}rest-mapper v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            config,
            default_headers,
            request_counter: AtomicU64::new(0),
        })
    }

    /// Returns the configuration this transport was built with.
    #[must_use]
    pub const fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Returns the headers added to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Resolves the final URL: path parameters substituted, relative paths
    /// joined onto the base URI.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError::UnresolvedPathParam`] if a `:name`
    /// placeholder remains after substitution.
    pub fn prepare_url(
        &self,
        url: &str,
        descriptor: &RequestDescriptor,
    ) -> Result<String, InvalidRequestError> {
        let url = self
            .config
            .base_uri()
            .join(&substitute_path_params(url, &descriptor.params));

        if let Some(name) = unresolved_path_params(&url).into_iter().next() {
            return Err(InvalidRequestError::UnresolvedPathParam { name, url });
        }

        Ok(url)
    }

    /// Adds `Accept` and, for verbs with a body, `Content-Type` unless the
    /// descriptor already sets them.
    pub fn prepare_headers(&self, descriptor: &mut RequestDescriptor) {
        let headers = &mut descriptor.headers;
        if !headers.has("Accept") {
            headers.append("Accept", "application/json");
        }
        if !headers.has("Content-Type") && descriptor.method.has_body() {
            headers.append("Content-Type", "application/json");
        }
        for (name, value) in &self.default_headers {
            if !headers.has(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    fn decode_body(body_text: &str) -> serde_json::Value {
        if body_text.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(body_text)
            .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
    }

    fn error_summary(method: HttpMethod, url: &str, response: &HttpResponse) -> String {
        let detail = response
            .body
            .get("res")
            .and_then(serde_json::Value::as_str)
            .map_or_else(|| response.body.to_string(), ToString::to_string);
        format!("[{method} {url}] {} {detail}", response.code)
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        url: &str,
        mut descriptor: RequestDescriptor,
    ) -> Result<HttpResponse, TransportError> {
        let request_number = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let url = self.prepare_url(url, &descriptor)?;
        self.prepare_headers(&mut descriptor);

        let method = descriptor.method;
        if self.config.request_logging() {
            tracing::debug!(request_number, %method, %url, "HTTP request");
        }

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Patch => self.client.patch(&url),
            HttpMethod::Delete => self.client.delete(&url),
            HttpMethod::Head => self.client.head(&url),
            HttpMethod::Options => self.client.request(reqwest::Method::OPTIONS, &url),
        };

        for (name, value) in descriptor.headers.iter() {
            req_builder = req_builder.header(name, value);
        }

        let pairs: Vec<(&str, &str)> = descriptor.search.iter().collect();
        if !pairs.is_empty() {
            req_builder = req_builder.query(&pairs);
        }

        if let Some(body) = &descriptor.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = match req_builder.send().await {
            Ok(res) => res,
            Err(e) => {
                if self.config.error_logging() {
                    tracing::error!(request_number, %method, %url, error = %e, "HTTP exchange failed");
                }
                return Err(e.into());
            }
        };

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await.unwrap_or_default();
        let response = HttpResponse::new(code, res_headers, Self::decode_body(&body_text));

        if response.is_ok() {
            if self.config.response_logging() {
                tracing::debug!(request_number, code, "HTTP response");
            }
            return Ok(response);
        }

        let message = Self::error_summary(method, &url, &response);
        if self.config.error_logging() {
            tracing::error!(request_number, code, "HTTP error: {}", message);
        }

        Err(TransportError::Response(HttpResponseError {
            code,
            message,
            error_reference: response.request_id().map(String::from),
            body: response.body,
        }))
    }
}
