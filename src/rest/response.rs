//! Result wrappers produced by the response parser.
//!
//! - [`Entity<M>`]: exactly one model
//! - [`Collection<M, P>`]: an ordered list of models plus pagination
//! - [`Pagination`]: six independently optional page markers
//! - [`ValidationErrors`]: the first error message per local field name
//!
//! Entities and collections implement `Deref` to their contents and are
//! read-only once built:
//!
//! ```rust
//! use rest_mapper::rest::{Collection, Pagination};
//!
//! let users = Collection::new(vec!["ada", "grace"], Pagination::default());
//! assert_eq!(users.len(), 2);
//! assert_eq!(users[0], "ada");
//! assert_eq!(users.pagination().page, None);
//! ```

use std::collections::BTreeMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rest::{Diagnostic, Diagnostics};

/// A single parsed model.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity<M> {
    data: M,
}

impl<M> Entity<M> {
    /// Wraps a model.
    #[must_use]
    pub const fn new(data: M) -> Self {
        Self { data }
    }

    /// Returns the wrapped model.
    #[must_use]
    pub const fn data(&self) -> &M {
        &self.data
    }

    /// Consumes the entity, returning the model.
    #[must_use]
    pub fn into_inner(self) -> M {
        self.data
    }
}

impl<M> Deref for Entity<M> {
    type Target = M;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Page markers read from the root of a collection envelope.
///
/// Each marker is either a non-negative integer or absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page.
    pub page: Option<u64>,
    /// Page size.
    pub per_page: Option<u64>,
    /// Previous page, if any.
    pub prev_page: Option<u64>,
    /// Next page, if any.
    pub next_page: Option<u64>,
    /// Offset of the first item on the page.
    pub from: Option<u64>,
    /// Offset of the last item on the page.
    pub to: Option<u64>,
}

/// Names one of the six [`Pagination`] markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaginationField {
    /// `page`
    Page,
    /// `perPage`
    PerPage,
    /// `prevPage`
    PrevPage,
    /// `nextPage`
    NextPage,
    /// `from`
    From,
    /// `to`
    To,
}

impl PaginationField {
    /// Every marker, in envelope order.
    pub const ALL: [Self; 6] = [
        Self::Page,
        Self::PerPage,
        Self::PrevPage,
        Self::NextPage,
        Self::From,
        Self::To,
    ];

    /// Returns the envelope key for this marker.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::PerPage => "perPage",
            Self::PrevPage => "prevPage",
            Self::NextPage => "nextPage",
            Self::From => "from",
            Self::To => "to",
        }
    }
}

impl Pagination {
    /// Returns the value of one marker.
    #[must_use]
    pub const fn get(&self, field: PaginationField) -> Option<u64> {
        match field {
            PaginationField::Page => self.page,
            PaginationField::PerPage => self.per_page,
            PaginationField::PrevPage => self.prev_page,
            PaginationField::NextPage => self.next_page,
            PaginationField::From => self.from,
            PaginationField::To => self.to,
        }
    }

    /// Sets the value of one marker.
    pub fn set(&mut self, field: PaginationField, value: Option<u64>) {
        let slot = match field {
            PaginationField::Page => &mut self.page,
            PaginationField::PerPage => &mut self.per_page,
            PaginationField::PrevPage => &mut self.prev_page,
            PaginationField::NextPage => &mut self.next_page,
            PaginationField::From => &mut self.from,
            PaginationField::To => &mut self.to,
        };
        *slot = value;
    }

    /// Returns `true` if no marker is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        PaginationField::ALL
            .iter()
            .all(|field| self.get(*field).is_none())
    }
}

/// An ordered list of models plus pagination.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection<M, P = Pagination> {
    data: Vec<M>,
    pagination: P,
}

impl<M, P> Collection<M, P> {
    /// Wraps a list of models.
    #[must_use]
    pub const fn new(data: Vec<M>, pagination: P) -> Self {
        Self { data, pagination }
    }

    /// Returns the models.
    #[must_use]
    pub fn data(&self) -> &[M] {
        &self.data
    }

    /// Returns the pagination.
    #[must_use]
    pub const fn pagination(&self) -> &P {
        &self.pagination
    }

    /// Consumes the collection, returning models and pagination.
    #[must_use]
    pub fn into_parts(self) -> (Vec<M>, P) {
        (self.data, self.pagination)
    }
}

impl<P> Collection<Value, P> {
    /// Builds a collection from an arbitrary JSON value.
    ///
    /// A sequence supplies the items. Anything else still builds, but
    /// records [`Diagnostic::NonSequenceCollection`]: `null` yields an empty
    /// collection and any other value becomes the single item. In those two
    /// cases [`Collection::data`] is a sequence wrapping the input, not the
    /// input itself.
    #[must_use]
    pub fn from_value(models: Value, pagination: P, diagnostics: &mut Diagnostics) -> Self {
        let data = match models {
            Value::Array(items) => items,
            other => {
                diagnostics.push(Diagnostic::NonSequenceCollection {
                    found: other.to_string(),
                });
                if other.is_null() {
                    Vec::new()
                } else {
                    vec![other]
                }
            }
        };
        Self::new(data, pagination)
    }
}

impl<M, P> Deref for Collection<M, P> {
    type Target = [M];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<'a, M, P> IntoIterator for &'a Collection<M, P> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Field-level validation errors, keyed by local field name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates an empty set of errors.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Returns the message for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterates over `(field, message)` pairs, ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            errors: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_derefs_to_model() {
        let entity = Entity::new(String::from("ada"));
        assert_eq!(entity.len(), 3);
        assert_eq!(entity.data(), "ada");
        assert_eq!(entity.into_inner(), "ada");
    }

    #[test]
    fn test_collection_from_sequence_is_silent() {
        let mut diagnostics = Diagnostics::new();
        let collection =
            Collection::from_value(json!([1, 2]), Pagination::default(), &mut diagnostics);

        assert_eq!(collection.data(), &[json!(1), json!(2)]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_collection_from_non_sequence_warns_but_builds() {
        let mut diagnostics = Diagnostics::new();
        let collection =
            Collection::from_value(json!({"id": 1}), Pagination::default(), &mut diagnostics);

        assert_eq!(collection.data(), &[json!({"id": 1})]);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::NonSequenceCollection { .. })
        ));

        let empty = Collection::from_value(Value::Null, (), &mut diagnostics);
        assert!(empty.is_empty());
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_pagination_get_and_set() {
        let mut pagination = Pagination::default();
        assert!(pagination.is_empty());

        pagination.set(PaginationField::NextPage, Some(4));
        assert_eq!(pagination.next_page, Some(4));
        assert_eq!(pagination.get(PaginationField::NextPage), Some(4));
        assert!(!pagination.is_empty());
    }

    #[test]
    fn test_pagination_serializes_with_envelope_keys() {
        let pagination = Pagination {
            per_page: Some(20),
            ..Pagination::default()
        };
        let value = serde_json::to_value(pagination).unwrap();
        assert_eq!(value.get("perPage"), Some(&json!(20)));

        for field in PaginationField::ALL {
            assert!(value.get(field.key()).is_some());
        }
    }

    #[test]
    fn test_validation_errors_lookup() {
        let errors: ValidationErrors = [("name", "is required"), ("age", "too low")]
            .into_iter()
            .collect();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("is required"));
        assert_eq!(errors.get("email"), None);
        assert_eq!(
            errors.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["age", "name"]
        );
    }
}
