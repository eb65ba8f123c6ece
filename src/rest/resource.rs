//! The [`Resource`] orchestrator.
//!
//! A resource ties one REST collection to a model type. It owns an immutable
//! [`ResourceConfig`] (base URL, field map, nested resources, model factory,
//! formatter and parser) and composes them for every call:
//!
//! ```text
//! intent -> before_send -> RequestFormatter -> Transport -> ResponseParser -> model
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_mapper::rest::{FieldMap, RequestIntent, Resource, ResourceConfig};
//!
//! let users = Resource::<User>::new(
//!     ResourceConfig::builder()
//!         .base_url("/users")
//!         .field_map(FieldMap::from([("first_name", "firstName")]))
//!         .build()?,
//! );
//!
//! let page = users.list(&transport, RequestIntent::new().token("secret")).await?;
//! for user in &page {
//!     println!("{:?}", user);
//! }
//! ```

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{
    HttpMethod, HttpResponse, HttpResponseError, RequestDescriptor, Transport, TransportError,
};
use crate::error::ConfigError;
use crate::rest::{
    map_fields, map_nested, Collection, Diagnostics, Entity, FieldMap, Fields, FormattedRequest,
    MapDirection, MethodInput, Model, ModelError, NestedFields, NestedResource, RequestFormatter,
    RequestIntent, ResourceError, ResponseParser,
};

/// Builds a model from local-named fields.
pub type ModelFactory<M> = Arc<dyn Fn(&Fields) -> Result<M, ModelError> + Send + Sync>;

/// Rewrites an intent before it is formatted.
pub type BeforeSend = Arc<dyn Fn(RequestIntent) -> RequestIntent + Send + Sync>;

/// Immutable configuration of a [`Resource`].
pub struct ResourceConfig<M> {
    base_url: String,
    field_map: FieldMap,
    nested: NestedFields,
    model_factory: ModelFactory<M>,
    formatter: RequestFormatter,
    parser: ResponseParser,
    before_send: Option<BeforeSend>,
}

impl<M: Model> ResourceConfig<M> {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> ResourceConfigBuilder<M> {
        ResourceConfigBuilder::new()
    }
}

impl<M> fmt::Debug for ResourceConfig<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut nested: Vec<&str> = self.nested.keys().map(String::as_str).collect();
        nested.sort_unstable();
        f.debug_struct("ResourceConfig")
            .field("base_url", &self.base_url)
            .field("field_map", &self.field_map)
            .field("nested", &nested)
            .field("formatter", &self.formatter)
            .field("parser", &self.parser)
            .field("before_send", &self.before_send.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ResourceConfig`].
///
/// Only `base_url` is required. The field map defaults to identity, nested
/// resources to none and the model factory to [`Model::build`].
pub struct ResourceConfigBuilder<M> {
    base_url: Option<String>,
    field_map: FieldMap,
    nested: NestedFields,
    model_factory: Option<ModelFactory<M>>,
    formatter: RequestFormatter,
    parser: ResponseParser,
    before_send: Option<BeforeSend>,
}

impl<M: Model> ResourceConfigBuilder<M> {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: None,
            field_map: FieldMap::new(),
            nested: NestedFields::new(),
            model_factory: None,
            formatter: RequestFormatter::default(),
            parser: ResponseParser::default(),
            before_send: None,
        }
    }

    /// Sets the base URL or path every request is sent under.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the wire → local field map.
    #[must_use]
    pub fn field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }

    /// Declares the resource responsible for a relation field.
    ///
    /// `field` is the local name. When the field map renames the relation,
    /// the wire key is resolved through it when the configuration is built,
    /// so both directions of mapping find the same field.
    #[must_use]
    pub fn nested(mut self, field: impl Into<String>, resource: Arc<dyn NestedResource>) -> Self {
        self.nested.insert(field.into(), resource);
        self
    }

    /// Replaces the model factory.
    #[must_use]
    pub fn model_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Fields) -> Result<M, ModelError> + Send + Sync + 'static,
    {
        self.model_factory = Some(Arc::new(factory));
        self
    }

    /// Replaces the request formatter.
    #[must_use]
    pub fn formatter(mut self, formatter: RequestFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Replaces the response parser.
    #[must_use]
    pub fn parser(mut self, parser: ResponseParser) -> Self {
        self.parser = parser;
        self
    }

    /// Sets a hook that rewrites every intent before formatting.
    #[must_use]
    pub fn before_send<F>(mut self, hook: F) -> Self
    where
        F: Fn(RequestIntent) -> RequestIntent + Send + Sync + 'static,
    {
        self.before_send = Some(Arc::new(hook));
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` was not
    /// set.
    pub fn build(self) -> Result<ResourceConfig<M>, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let wire_names = self.field_map.inverted();
        let nested = self
            .nested
            .into_iter()
            .map(|(local, resource)| {
                let wire = wire_names.get(&local).map_or(local, ToString::to_string);
                (wire, resource)
            })
            .collect();

        Ok(ResourceConfig {
            base_url,
            field_map: self.field_map,
            nested,
            model_factory: match self.model_factory {
                Some(factory) => factory,
                None => Arc::new(M::build),
            },
            formatter: self.formatter,
            parser: self.parser,
            before_send: self.before_send,
        })
    }
}

impl<M: Model> Default for ResourceConfigBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// A request ready for the transport.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    /// The URL, relative or absolute.
    pub url: String,
    /// The canonical request.
    pub descriptor: RequestDescriptor,
    /// Anomalies noticed while formatting.
    pub diagnostics: Diagnostics,
}

/// One REST resource bound to a model type.
pub struct Resource<M> {
    config: ResourceConfig<M>,
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource<Fields>>();
};

impl<M> fmt::Debug for Resource<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("config", &self.config)
            .finish()
    }
}

impl<M: Model> Resource<M> {
    /// Creates a resource from its configuration.
    #[must_use]
    pub const fn new(config: ResourceConfig<M>) -> Self {
        Self { config }
    }

    /// Returns the base URL or path.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Returns the configured field map.
    #[must_use]
    pub const fn field_map(&self) -> &FieldMap {
        &self.config.field_map
    }

    /// Returns the request formatter.
    #[must_use]
    pub const fn formatter(&self) -> &RequestFormatter {
        &self.config.formatter
    }

    /// Returns the response parser.
    #[must_use]
    pub const fn parser(&self) -> &ResponseParser {
        &self.config.parser
    }

    /// Renames the keys of `raw`, using `explicit` or the configured map.
    #[must_use]
    pub fn map(
        &self,
        raw: &Fields,
        direction: MapDirection,
        explicit: Option<&FieldMap>,
    ) -> Fields {
        map_fields(raw, explicit.unwrap_or(&self.config.field_map), direction)
    }

    /// Builds a model from a wire object.
    ///
    /// Nested relation fields are expanded first, then flat fields are
    /// renamed, then the model factory runs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a nested resource or the factory rejects
    /// the data.
    pub fn make_model(&self, raw: &Fields) -> Result<M, ModelError> {
        let expanded = map_nested(raw, &self.config.nested, MapDirection::Forward)?;
        let mapped = self.map(&expanded, MapDirection::Forward, None);
        (self.config.model_factory)(&mapped)
    }

    /// Turns a model back into a wire object.
    ///
    /// The structural inverse of [`Resource::make_model`] for every key
    /// covered by the field map and the nested resources.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a nested resource rejects a relation field.
    pub fn make_raw_entity(&self, model: &M) -> Result<Fields, ModelError> {
        let mapped = self.map(&model.to_fields(), MapDirection::Reverse, None);
        map_nested(&mapped, &self.config.nested, MapDirection::Reverse)
    }

    /// Applies the `before_send` hook and formats `intent`.
    ///
    /// With `use_base_url`, `path` is appended to the base URL; otherwise it
    /// is used on its own.
    #[must_use]
    pub fn prepare(
        &self,
        intent: RequestIntent,
        path: &str,
        use_base_url: bool,
    ) -> PreparedRequest {
        let intent = match &self.config.before_send {
            Some(hook) => hook(intent),
            None => intent,
        };

        let url = if use_base_url {
            format!("{}{path}", self.config.base_url)
        } else {
            path.to_string()
        };

        let FormattedRequest {
            descriptor,
            diagnostics,
        } = self.config.formatter.format(intent, &self.config.field_map);

        PreparedRequest {
            url,
            descriptor,
            diagnostics,
        }
    }

    /// Formats `intent` and hands it to `transport`.
    ///
    /// The transport result is returned unmodified. Formatting diagnostics
    /// are logged; use [`Resource::prepare`] to inspect them.
    ///
    /// # Errors
    ///
    /// Propagates the [`TransportError`] untouched.
    pub async fn send<T: Transport>(
        &self,
        transport: &T,
        intent: RequestIntent,
        path: &str,
        use_base_url: bool,
    ) -> Result<HttpResponse, TransportError> {
        let PreparedRequest {
            url,
            descriptor,
            diagnostics,
        } = self.prepare(intent, path, use_base_url);

        tracing::debug!(
            %url,
            method = %descriptor.method,
            diagnostics = diagnostics.len(),
            "Sending resource request"
        );

        transport.send(&url, descriptor).await
    }

    /// Converts a 422 validation envelope into
    /// [`ResourceError::ValidationFailed`].
    ///
    /// Field names are translated to local names. Any other error,
    /// including a 422 whose body is not an object, is returned unchanged.
    #[must_use]
    pub fn catch_validation(&self, error: ResourceError) -> ResourceError {
        catch_status(error, 422, |response| {
            if !response.body.is_object() {
                return ResourceError::Transport(TransportError::Response(response));
            }
            let errors = self.config.parser.validation(&response.body, |fields| {
                self.map(fields, MapDirection::Forward, None)
            });
            ResourceError::ValidationFailed(errors)
        })
    }

    /// Returns the parser's entity step bound to this resource.
    pub fn map_entity(&self) -> impl Fn(&HttpResponse) -> Result<Entity<M>, ResourceError> + '_ {
        move |response| {
            self.config
                .parser
                .entity(response, |raw| self.make_model(raw))
        }
    }

    /// Returns the parser's collection step bound to this resource.
    pub fn map_collection(
        &self,
    ) -> impl Fn(&HttpResponse) -> Result<Collection<M>, ResourceError> + '_ {
        move |response| {
            self.config
                .parser
                .collection(response, |raw| self.make_model(raw))
        }
    }

    /// Fetches one model: GET `<base>/<id>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the exchange or the parsing fails.
    pub async fn view<T: Transport>(
        &self,
        transport: &T,
        id: impl Display,
        intent: RequestIntent,
    ) -> Result<Entity<M>, ResourceError> {
        let response = self.send(transport, intent, &format!("/{id}"), true).await?;
        self.map_entity()(&response)
    }

    /// Fetches a page of models: GET `<base>`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the exchange or the parsing fails.
    pub async fn list<T: Transport>(
        &self,
        transport: &T,
        intent: RequestIntent,
    ) -> Result<Collection<M>, ResourceError> {
        let response = self.send(transport, intent, "", true).await?;
        self.map_collection()(&response)
    }

    /// Creates a model: POST `<base>` with the model as body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] for a 422 validation
    /// envelope, or another [`ResourceError`] if the call fails.
    pub async fn create<T: Transport>(
        &self,
        transport: &T,
        model: &M,
        intent: RequestIntent,
    ) -> Result<Entity<M>, ResourceError> {
        let body = Value::Object(self.make_raw_entity(model)?);
        let intent = with_defaults(intent, HttpMethod::Post, Some(body));
        let response = self
            .send(transport, intent, "", true)
            .await
            .map_err(|e| self.catch_validation(e.into()))?;
        self.map_entity()(&response)
    }

    /// Replaces a model: PUT `<base>/<pk>` with the model as body.
    ///
    /// `pk` names the local field holding the primary key.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] for a 422 validation
    /// envelope, [`ResourceError::Model`] if the model has no value for
    /// `pk`, or another [`ResourceError`] if the call fails.
    pub async fn update<T: Transport>(
        &self,
        transport: &T,
        model: &M,
        pk: &str,
        intent: RequestIntent,
    ) -> Result<Entity<M>, ResourceError> {
        let path = primary_key_path(model, pk)?;
        let body = Value::Object(self.make_raw_entity(model)?);
        let intent = with_defaults(intent, HttpMethod::Put, Some(body));
        let response = self
            .send(transport, intent, &path, true)
            .await
            .map_err(|e| self.catch_validation(e.into()))?;
        self.map_entity()(&response)
    }

    /// Deletes a model: DELETE `<base>/<pk>`.
    ///
    /// Returns the decoded response body as-is.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ValidationFailed`] for a 422 validation
    /// envelope, [`ResourceError::Model`] if the model has no value for
    /// `pk`, or another [`ResourceError`] if the call fails.
    pub async fn delete<T: Transport>(
        &self,
        transport: &T,
        model: &M,
        pk: &str,
        intent: RequestIntent,
    ) -> Result<Value, ResourceError> {
        let path = primary_key_path(model, pk)?;
        let intent = with_defaults(intent, HttpMethod::Delete, None);
        let response = self
            .send(transport, intent, &path, true)
            .await
            .map_err(|e| self.catch_validation(e.into()))?;
        Ok(response.body)
    }
}

impl<M: Model> NestedResource for Resource<M> {
    fn expand_object(
        &self,
        object: &Fields,
        direction: MapDirection,
    ) -> Result<Fields, ModelError> {
        match direction {
            MapDirection::Forward => self.make_model(object).map(|model| model.to_fields()),
            MapDirection::Reverse => {
                let model = (self.config.model_factory)(object)?;
                self.make_raw_entity(&model)
            }
        }
    }
}

/// Intercepts transport responses with the given status.
///
/// If `error` carries an HTTP response with status `code`, `handler`
/// decides what to return instead; every other error passes through
/// unchanged.
///
/// ```rust
/// use rest_mapper::clients::{HttpResponseError, TransportError};
/// use rest_mapper::rest::{catch_status, ResourceError};
/// use serde_json::json;
///
/// let error = ResourceError::Transport(TransportError::Response(HttpResponseError {
///     code: 404,
///     body: json!({}),
///     message: "Not found".to_string(),
///     error_reference: None,
/// }));
///
/// let error = catch_status(error, 404, |_| ResourceError::MalformedResponseBody {
///     reason: "gone".to_string(),
/// });
/// assert!(matches!(error, ResourceError::MalformedResponseBody { .. }));
/// ```
pub fn catch_status<F>(error: ResourceError, code: u16, handler: F) -> ResourceError
where
    F: FnOnce(HttpResponseError) -> ResourceError,
{
    match error {
        ResourceError::Transport(TransportError::Response(response)) if response.code == code => {
            handler(response)
        }
        other => other,
    }
}

fn with_defaults(
    mut intent: RequestIntent,
    method: HttpMethod,
    body: Option<Value>,
) -> RequestIntent {
    intent.method.get_or_insert(MethodInput::Verb(method));
    if intent.body.is_none() {
        intent.body = body;
    }
    intent
}

fn primary_key_path<M: Model>(model: &M, pk: &str) -> Result<String, ModelError> {
    match model.to_fields().get(pk) {
        Some(Value::String(id)) => Ok(format!("/{id}")),
        Some(value) if !value.is_null() => Ok(format!("/{value}")),
        other => Err(ModelError::InvalidField {
            field: pk.to_string(),
            expected: "primary key",
            found: other.map_or_else(|| "nothing".to_string(), ToString::to_string),
        }),
    }
}
