//! Field-name translation between wire and local representations.
//!
//! A [`FieldMap`] maps wire names to local names. Translating in the
//! [`MapDirection::Reverse`] direction uses the inverted map. Keys missing
//! from the map pass through unchanged, and values are never touched.
//!
//! Relation fields are delegated to other resources through
//! [`NestedResource`]; see [`map_nested`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::rest::model::is_truthy;
use crate::rest::{Fields, ModelError};

/// Direction of a field-name translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MapDirection {
    /// Wire names to local names.
    #[default]
    Forward,
    /// Local names to wire names.
    Reverse,
}

/// A mapping of wire field names to local field names.
///
/// The map is assumed to be injective but this is never checked. Inverting
/// a map where two wire names share a local name keeps only one of them.
///
/// # Example
///
/// ```rust
/// use rest_mapper::rest::{map_fields, FieldMap, MapDirection};
/// use serde_json::json;
///
/// let map = FieldMap::from([("first_name", "firstName")]);
/// let raw = json!({"first_name": "Ada", "id": 1});
///
/// let local = map_fields(raw.as_object().unwrap(), &map, MapDirection::Forward);
/// assert_eq!(local.get("firstName"), Some(&json!("Ada")));
/// assert_eq!(local.get("id"), Some(&json!(1)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: HashMap<String, String>,
}

impl FieldMap {
    /// Creates an empty (identity) map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wire → local pairing, returning the map.
    #[must_use]
    pub fn with(mut self, wire: impl Into<String>, local: impl Into<String>) -> Self {
        self.insert(wire, local);
        self
    }

    /// Adds a wire → local pairing.
    pub fn insert(&mut self, wire: impl Into<String>, local: impl Into<String>) {
        self.entries.insert(wire.into(), local.into());
    }

    /// Returns the local name for a wire name.
    #[must_use]
    pub fn get(&self, wire: &str) -> Option<&str> {
        self.entries.get(wire).map(String::as_str)
    }

    /// Returns the map with keys and values swapped.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(wire, local)| (local.clone(), wire.clone()))
                .collect(),
        }
    }

    /// Iterates over `(wire, local)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of pairings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for the identity map.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for FieldMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Renames the keys of `raw` through `map`, in the given direction.
///
/// Returns a new object; `raw` is left untouched.
#[must_use]
pub fn map_fields(raw: &Fields, map: &FieldMap, direction: MapDirection) -> Fields {
    if map.is_empty() {
        return raw.clone();
    }

    let inverted;
    let working = match direction {
        MapDirection::Forward => map,
        MapDirection::Reverse => {
            inverted = map.inverted();
            &inverted
        }
    };

    raw.iter()
        .map(|(key, value)| {
            let name = working.get(key).unwrap_or(key.as_str());
            (name.to_string(), value.clone())
        })
        .collect()
}

/// A resource that can expand one relation field of another resource.
///
/// Implemented by [`Resource`](crate::rest::Resource) for every model type,
/// so any resource can be declared as the handler of a nested field.
pub trait NestedResource: Send + Sync + fmt::Debug {
    /// Converts a single related object.
    ///
    /// Forward: a wire object becomes the local fields of a built model.
    /// Reverse: local model fields become a wire-ready object.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the value is not an object or the model
    /// factory rejects it.
    fn expand_object(&self, object: &Fields, direction: MapDirection)
        -> Result<Fields, ModelError>;

    /// Converts a related value, element-wise for sequences.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotAnObject`] for values that are neither an
    /// object nor a sequence of objects.
    fn expand(&self, value: &Value, direction: MapDirection) -> Result<Value, ModelError> {
        match value {
            Value::Object(object) => self.expand_object(object, direction).map(Value::Object),
            Value::Array(items) => items
                .iter()
                .map(|item| self.expand(item, direction))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(ModelError::NotAnObject {
                found: other.to_string(),
            }),
        }
    }
}

/// Relation fields and the resources responsible for them.
pub type NestedFields = HashMap<String, Arc<dyn NestedResource>>;

/// Delegates each declared relation field of `source` to its resource.
///
/// Only fields that are present and truthy are converted; the result
/// replaces the value on a shallow copy of `source`.
///
/// # Errors
///
/// Propagates the first [`ModelError`] raised by a nested resource.
pub fn map_nested(
    source: &Fields,
    nested: &NestedFields,
    direction: MapDirection,
) -> Result<Fields, ModelError> {
    let mut result = source.clone();
    for (field, resource) in nested {
        let Some(value) = source.get(field).filter(|value| is_truthy(value)) else {
            continue;
        };
        let expanded = resource.expand(value, direction)?;
        result.insert(field.clone(), expanded);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[derive(Debug)]
    struct Upper;

    impl NestedResource for Upper {
        fn expand_object(
            &self,
            object: &Fields,
            direction: MapDirection,
        ) -> Result<Fields, ModelError> {
            Ok(object
                .iter()
                .map(|(k, v)| {
                    let key = match direction {
                        MapDirection::Forward => k.to_uppercase(),
                        MapDirection::Reverse => k.to_lowercase(),
                    };
                    (key, v.clone())
                })
                .collect())
        }
    }

    #[test]
    fn test_forward_renames_mapped_keys_only() {
        let map = FieldMap::from([("a", "x")]);
        let raw = fields(json!({"a": 1, "b": 2}));

        let mapped = map_fields(&raw, &map, MapDirection::Forward);
        assert_eq!(Value::Object(mapped), json!({"x": 1, "b": 2}));
        assert_eq!(Value::Object(raw), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_round_trip_restores_mapped_keys() {
        let map = FieldMap::new()
            .with("first_name", "firstName")
            .with("last_name", "lastName");
        let raw = fields(json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "born": 1815
        }));

        let local = map_fields(&raw, &map, MapDirection::Forward);
        assert!(local.contains_key("firstName"));
        assert_eq!(local.get("born"), Some(&json!(1815)));

        let wire = map_fields(&local, &map, MapDirection::Reverse);
        assert_eq!(wire, raw);
    }

    #[test]
    fn test_inversion_keeps_one_of_colliding_pairs() {
        let map = FieldMap::from([("a", "x"), ("b", "x")]);
        let inverted = map.inverted();

        assert_eq!(inverted.len(), 1);
        assert!(matches!(inverted.get("x"), Some("a" | "b")));
    }

    #[test]
    fn test_map_nested_converts_truthy_fields() {
        let mut nested = NestedFields::new();
        nested.insert("city".to_string(), Arc::new(Upper));
        nested.insert("tags".to_string(), Arc::new(Upper));
        nested.insert("owner".to_string(), Arc::new(Upper));

        let source = fields(json!({
            "city": {"name": "Oslo"},
            "tags": [{"k": 1}, {"v": 2}],
            "owner": null,
            "id": 3
        }));

        let expanded = map_nested(&source, &nested, MapDirection::Forward).unwrap();
        assert_eq!(
            Value::Object(expanded.clone()),
            json!({
                "city": {"NAME": "Oslo"},
                "tags": [{"K": 1}, {"V": 2}],
                "owner": null,
                "id": 3
            })
        );

        let restored = map_nested(&expanded, &nested, MapDirection::Reverse).unwrap();
        assert_eq!(restored, source);
    }

    #[test]
    fn test_map_nested_rejects_scalars() {
        let mut nested = NestedFields::new();
        nested.insert("city".to_string(), Arc::new(Upper));

        let source = fields(json!({"city": "Oslo"}));
        let result = map_nested(&source, &nested, MapDirection::Forward);
        assert!(matches!(result, Err(ModelError::NotAnObject { .. })));
    }
}
