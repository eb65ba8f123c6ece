//! The [`Model`] trait and typed field coercions.
//!
//! A model is a value record built from a flat map of local field names
//! ([`Fields`]). Construction goes through [`Model::build`], which runs the
//! [`Model::init`] hook exactly once. [`ModelFill`] provides the coercions a
//! model uses to read its fields: every coercion maps a missing or `null`
//! value to `None` and converts everything else, so defined falsy values
//! (`0`, `false`, `""`) survive as themselves.
//!
//! # Example
//!
//! ```rust
//! use rest_mapper::rest::{Fields, Model, ModelError, ModelFill};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct User {
//!     id: Option<i64>,
//!     name: Option<String>,
//!     is_admin: Option<bool>,
//! }
//!
//! impl Model for User {
//!     fn from_fields(fields: &Fields) -> Result<Self, ModelError> {
//!         let fill = ModelFill::new(fields);
//!         Ok(Self {
//!             id: fill.integer("id")?,
//!             name: fill.string("name"),
//!             is_admin: fill.boolean("isAdmin"),
//!         })
//!     }
//!
//!     fn to_fields(&self) -> Fields {
//!         let mut fields = Fields::new();
//!         fields.insert("id".to_string(), json!(self.id));
//!         fields.insert("name".to_string(), json!(self.name));
//!         fields.insert("isAdmin".to_string(), json!(self.is_admin));
//!         fields
//!     }
//! }
//!
//! let raw = json!({"id": "7", "name": "", "isAdmin": 0});
//! let user = User::build(raw.as_object().unwrap()).unwrap();
//! assert_eq!(user.id, Some(7));
//! assert_eq!(user.name.as_deref(), Some(""));
//! assert_eq!(user.is_admin, Some(false));
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::rest::ModelError;

/// A flat map of field names to JSON values.
pub type Fields = Map<String, Value>;

/// A value record with a construction lifecycle.
pub trait Model: Clone + Send + Sync + Sized + 'static {
    /// Reads the model's fields from local-named raw data.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a field cannot be coerced.
    fn from_fields(fields: &Fields) -> Result<Self, ModelError>;

    /// Writes the model back to local-named raw data.
    fn to_fields(&self) -> Fields;

    /// Initialization hook, run once after construction.
    fn init(&mut self) {}

    /// Constructs the model and runs [`Model::init`].
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Model::from_fields`].
    fn build(fields: &Fields) -> Result<Self, ModelError> {
        let mut model = Self::from_fields(fields)?;
        model.init();
        Ok(model)
    }

    /// Shallow-copies the model, overriding the given fields.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Model::from_fields`].
    fn clone_with(&self, updates: Fields) -> Result<Self, ModelError> {
        let mut fields = self.to_fields();
        fields.extend(updates);
        Self::build(&fields)
    }
}

/// Schemaless records: the fields are the model.
impl Model for Fields {
    fn from_fields(fields: &Fields) -> Result<Self, ModelError> {
        Ok(fields.clone())
    }

    fn to_fields(&self) -> Fields {
        self.clone()
    }
}

/// JSON truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerces a JSON value to a number, the way arithmetic coercion would.
///
/// Numeric strings are trimmed (an empty string is `0`), booleans are `1`
/// and `0`. Returns `None` for anything else.
pub(crate) fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Typed field readers used inside [`Model::from_fields`].
#[derive(Clone, Copy, Debug)]
pub struct ModelFill<'a> {
    data: &'a Fields,
}

impl<'a> ModelFill<'a> {
    /// Wraps raw fields for reading.
    #[must_use]
    pub const fn new(data: &'a Fields) -> Self {
        Self { data }
    }

    /// Returns the raw value of a field, or `None` if missing or `null`.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.data.get(name).filter(|value| !value.is_null())
    }

    /// Reads a field as a boolean using JSON truthiness.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.raw(name).map(is_truthy)
    }

    /// Reads a field as a string.
    ///
    /// Strings are returned as-is, numbers and booleans as their text,
    /// arrays and objects as compact JSON.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<String> {
        self.raw(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Reads a field as a number.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidField`] if the value is not numeric.
    pub fn number(&self, name: &str) -> Result<Option<f64>, ModelError> {
        self.raw(name)
            .map(|value| to_number(value).ok_or_else(|| invalid(name, "number", value)))
            .transpose()
    }

    /// Reads a field as a whole number.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidField`] if the value is not numeric or
    /// has a fractional part.
    #[allow(clippy::cast_possible_truncation)]
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ModelError> {
        self.raw(name)
            .map(|value| {
                if let Some(i) = value.as_i64() {
                    return Ok(i);
                }
                to_number(value)
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
                    .ok_or_else(|| invalid(name, "integer", value))
            })
            .transpose()
    }

    /// Reads a nested model from an object field.
    ///
    /// Non-object values yield `None`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested model's construction.
    pub fn model<N: Model>(&self, name: &str) -> Result<Option<N>, ModelError> {
        match self.raw(name) {
            Some(Value::Object(fields)) => N::build(fields).map(Some),
            _ => Ok(None),
        }
    }

    /// Reads a date from an RFC 3339 string or epoch milliseconds.
    ///
    /// Anything else yields `None`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn date(&self, name: &str) -> Option<DateTime<Utc>> {
        match self.raw(name)? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|date| date.with_timezone(&Utc)),
            Value::Number(n) => {
                let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
                Utc.timestamp_millis_opt(millis).single()
            }
            _ => None,
        }
    }

    /// Reads a sequence field as a shallow copy.
    ///
    /// Non-sequence values yield `None`.
    #[must_use]
    pub fn array(&self, name: &str) -> Option<Vec<Value>> {
        self.raw(name)?.as_array().cloned()
    }
}

fn invalid(field: &str, expected: &'static str, value: &Value) -> ModelError {
    ModelError::InvalidField {
        field: field.to_string(),
        expected,
        found: value.to_string(),
    }
}
