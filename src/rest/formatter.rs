//! Normalization of a [`RequestIntent`] into a [`RequestDescriptor`].
//!
//! Formatting never fails. The steps run in a fixed order, and that order
//! decides precedence:
//!
//! 1. Method: a canonical verb passes through; a method name has its first
//!    character upper-cased and is matched against the verb set. Unknown
//!    names fall back to GET with an [`Diagnostic::UnknownVerb`].
//! 2. Headers: taken from the intent; a token adds
//!    `Authorization: Bearer <token>` unless an `Authorization` header exists.
//! 3. Query: the intent's search input in whichever shape it was given.
//! 4. Pagination: each requested marker fills its query parameter unless the
//!    caller already set that parameter.
//! 5. Field selection: `expand` and `fields` name lists are translated to
//!    wire names and joined with commas, unless disabled or already set.
//! 6. Body and path parameters pass through.

use crate::clients::{HeaderCollection, HttpMethod, QueryParams, RequestDescriptor};
use crate::rest::{
    Diagnostic, Diagnostics, FieldMap, MethodInput, PaginationField, RequestIntent,
};

/// The result of formatting: a descriptor plus any non-fatal diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct FormattedRequest {
    /// The canonical request.
    pub descriptor: RequestDescriptor,
    /// Anomalies noticed while formatting.
    pub diagnostics: Diagnostics,
}

/// Turns request intents into descriptors.
///
/// Query-parameter names for field selection and pagination are
/// configurable. Setting `expand` or `fields` to `None` (or an empty name)
/// disables that feature.
///
/// # Example
///
/// ```rust
/// use rest_mapper::rest::{FieldMap, Pagination, RequestFormatter, RequestIntent};
///
/// let formatter = RequestFormatter::new().fields_param(Some("select"));
/// let intent = RequestIntent::new()
///     .method("put")
///     .search("page=5")
///     .pagination(Pagination { page: Some(3), per_page: Some(20), ..Pagination::default() })
///     .fields(["firstName"]);
///
/// let map = FieldMap::from([("first_name", "firstName")]);
/// let formatted = formatter.format(intent, &map);
/// let search = &formatted.descriptor.search;
///
/// assert_eq!(formatted.descriptor.method.to_string(), "PUT");
/// assert_eq!(search.get("page"), Some("5"));
/// assert_eq!(search.get("perPage"), Some("20"));
/// assert_eq!(search.get("select"), Some("first_name"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestFormatter {
    expand_param: Option<String>,
    fields_param: Option<String>,
    pagination_params: Vec<(PaginationField, String)>,
}

impl Default for RequestFormatter {
    fn default() -> Self {
        Self {
            expand_param: Some("expand".to_string()),
            fields_param: Some("fields".to_string()),
            pagination_params: vec![
                (PaginationField::Page, "page".to_string()),
                (PaginationField::PerPage, "perPage".to_string()),
                (PaginationField::From, "from".to_string()),
                (PaginationField::To, "to".to_string()),
            ],
        }
    }
}

impl RequestFormatter {
    /// Creates a formatter with the default parameter names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames or disables the `expand` query parameter.
    #[must_use]
    pub fn expand_param(mut self, name: Option<&str>) -> Self {
        self.expand_param = enabled(name);
        self
    }

    /// Renames or disables the `fields` query parameter.
    #[must_use]
    pub fn fields_param(mut self, name: Option<&str>) -> Self {
        self.fields_param = enabled(name);
        self
    }

    /// Replaces the ordered pagination marker → query parameter table.
    #[must_use]
    pub fn pagination_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (PaginationField, S)>,
        S: Into<String>,
    {
        self.pagination_params = params
            .into_iter()
            .map(|(field, name)| (field, name.into()))
            .collect();
        self
    }

    /// Returns the `expand` query parameter name, if enabled.
    #[must_use]
    pub fn expand_param_name(&self) -> Option<&str> {
        self.expand_param.as_deref()
    }

    /// Returns the `fields` query parameter name, if enabled.
    #[must_use]
    pub fn fields_param_name(&self) -> Option<&str> {
        self.fields_param.as_deref()
    }

    /// Builds a descriptor from `intent`.
    ///
    /// `field_map` translates `expand` and `fields` names from local to
    /// wire form.
    #[must_use]
    pub fn format(&self, intent: RequestIntent, field_map: &FieldMap) -> FormattedRequest {
        let mut diagnostics = Diagnostics::new();

        let method = resolve_method(intent.method, &mut diagnostics);

        let mut headers: HeaderCollection = intent.headers.map(Into::into).unwrap_or_default();
        if let Some(token) = intent.token.filter(|token| !token.is_empty()) {
            if !headers.has("Authorization") {
                headers.set("Authorization", format!("Bearer {token}"));
            }
        }

        let mut search: QueryParams = intent.search.map(Into::into).unwrap_or_default();

        if let Some(pagination) = intent.pagination {
            for (field, name) in &self.pagination_params {
                if let Some(value) = pagination.get(*field) {
                    if !search.has(name) {
                        search.set(name.as_str(), value.to_string());
                    }
                }
            }
        }

        let wire_names = field_map.inverted();
        for (param, names) in [
            (&self.expand_param, &intent.expand),
            (&self.fields_param, &intent.fields),
        ] {
            let Some(param) = param else { continue };
            if names.is_empty() || search.has(param) {
                continue;
            }
            let joined = names
                .iter()
                .map(|name| wire_names.get(name).unwrap_or(name.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            search.set(param.as_str(), joined);
        }

        FormattedRequest {
            descriptor: RequestDescriptor {
                method,
                headers,
                search,
                body: intent.body,
                params: intent.params,
            },
            diagnostics,
        }
    }
}

fn enabled(name: Option<&str>) -> Option<String> {
    name.filter(|name| !name.is_empty()).map(String::from)
}

fn resolve_method(method: Option<MethodInput>, diagnostics: &mut Diagnostics) -> HttpMethod {
    let name = match method {
        None => return HttpMethod::Get,
        Some(MethodInput::Verb(verb)) => return verb,
        Some(MethodInput::Name(name)) if name.is_empty() => return HttpMethod::Get,
        Some(MethodInput::Name(name)) => name,
    };

    let mut chars = name.chars();
    let key: String = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();

    HttpMethod::from_variant_name(&key).unwrap_or_else(|| {
        diagnostics.push(Diagnostic::UnknownVerb { method: name });
        HttpMethod::Get
    })
}
