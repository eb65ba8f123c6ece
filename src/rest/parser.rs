//! Parsing of response envelopes into entities, collections and
//! validation errors.
//!
//! Every successful body is expected to be a JSON object (the envelope).
//! Payloads live under the data key (`"data"` by default) and pagination
//! markers are siblings of it at the envelope root:
//!
//! ```json
//! { "data": [{ "id": 1 }], "page": 1, "perPage": 20, "nextPage": 2 }
//! ```
//!
//! A body that is not an object, including a bare array at the root, is
//! rejected with [`ResourceError::MalformedResponseBody`] whatever the
//! status code.

use serde_json::Value;

use crate::clients::HttpResponse;
use crate::rest::model::{is_truthy, to_number};
use crate::rest::{
    Collection, Entity, Fields, ModelError, Pagination, PaginationField, ResourceError,
    ValidationErrors,
};

/// Turns decoded responses into result wrappers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseParser {
    data_key: String,
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self {
            data_key: "data".to_string(),
        }
    }
}

impl ResponseParser {
    /// Creates a parser reading payloads from `"data"`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the envelope key holding the payload.
    #[must_use]
    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = key.into();
        self
    }

    /// Returns the envelope key holding the payload.
    #[must_use]
    pub fn data_key_name(&self) -> &str {
        &self.data_key
    }

    /// Returns the envelope of a response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponseBody`] if the body is not
    /// an object.
    pub fn extract_data<'a>(
        &self,
        response: &'a HttpResponse,
    ) -> Result<&'a Fields, ResourceError> {
        match &response.body {
            Value::Object(envelope) => Ok(envelope),
            Value::Array(_) => Err(ResourceError::malformed(format!(
                "bare array at the response root (status {})",
                response.code
            ))),
            other => Err(ResourceError::malformed(format!(
                "expected an object, found {other} (status {})",
                response.code
            ))),
        }
    }

    /// Returns a copy of the checked envelope.
    ///
    /// # Errors
    ///
    /// Fails like [`ResponseParser::extract_data`].
    pub fn json(&self, response: &HttpResponse) -> Result<Fields, ResourceError> {
        self.extract_data(response).cloned()
    }

    /// Builds one model from the envelope's payload object.
    ///
    /// A missing or `null` payload builds the model from empty fields, so an
    /// empty success body (`{}`) still yields an entity.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponseBody`] if the envelope is
    /// not an object or its payload is neither an object nor `null`, and
    /// [`ResourceError::Model`] if the model cannot be built.
    pub fn entity<M, F>(
        &self,
        response: &HttpResponse,
        make_model: F,
    ) -> Result<Entity<M>, ResourceError>
    where
        F: Fn(&Fields) -> Result<M, ModelError>,
    {
        let envelope = self.extract_data(response)?;
        let model = match envelope.get(&self.data_key) {
            Some(Value::Object(data)) => make_model(data)?,
            None | Some(Value::Null) => make_model(&Fields::new())?,
            Some(other) => {
                return Err(ResourceError::malformed(format!(
                    "'{}' should be an object, found {other}",
                    self.data_key
                )))
            }
        };

        Ok(Entity::new(model))
    }

    /// Builds every model of the envelope's payload sequence, plus the
    /// pagination read from the envelope root.
    ///
    /// One failing element fails the whole call.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MalformedResponseBody`] if the envelope is
    /// not an object, its payload is not a sequence, or an element is not an
    /// object, and [`ResourceError::Model`] if a model cannot be built.
    pub fn collection<M, F>(
        &self,
        response: &HttpResponse,
        make_model: F,
    ) -> Result<Collection<M>, ResourceError>
    where
        F: Fn(&Fields) -> Result<M, ModelError>,
    {
        let envelope = self.extract_data(response)?;
        let Some(Value::Array(items)) = envelope.get(&self.data_key) else {
            return Err(ResourceError::malformed(format!(
                "'{}' should be a sequence",
                self.data_key
            )));
        };

        let models = items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => make_model(fields).map_err(ResourceError::from),
                other => Err(ResourceError::malformed(format!(
                    "'{}'[{index}] should be an object, found {other}",
                    self.data_key
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Collection::new(models, self.extract_pagination(response)))
    }

    /// Reads the six pagination markers from the envelope root.
    ///
    /// Never fails: a malformed envelope yields empty pagination. A marker
    /// is kept when it is a positive number or numeric string (fractions are
    /// truncated); anything else, including `0`, is absent.
    #[must_use]
    pub fn extract_pagination(&self, response: &HttpResponse) -> Pagination {
        let mut pagination = Pagination::default();
        let Ok(envelope) = self.extract_data(response) else {
            return pagination;
        };

        for field in PaginationField::ALL {
            let value = envelope.get(field.key()).and_then(page_marker);
            pagination.set(field, value);
        }
        pagination
    }

    /// Reduces a raw validation envelope to the first message per field,
    /// then renames the fields with `map`.
    ///
    /// The envelope is expected to map field names to lists of messages.
    /// A non-object envelope yields no errors and a plain string is taken as
    /// the message itself. Fields whose value (or first message) is `null`
    /// are skipped, as are empty lists.
    pub fn validation<F>(&self, raw: &Value, map: F) -> ValidationErrors
    where
        F: FnOnce(&Fields) -> Fields,
    {
        let Some(raw) = raw.as_object() else {
            return ValidationErrors::new();
        };

        let first_errors: Fields = raw
            .iter()
            .filter_map(|(field, messages)| {
                let first = match messages {
                    Value::Array(items) => items.first()?,
                    other => other,
                };
                (!first.is_null()).then(|| (field.clone(), first.clone()))
            })
            .collect();

        map(&first_errors)
            .into_iter()
            .map(|(field, message)| {
                let message = match message {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (field, message)
            })
            .collect()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn page_marker(value: &Value) -> Option<u64> {
    if !is_truthy(value) {
        return None;
    }
    to_number(value)
        .filter(|number| *number >= 1.0)
        .map(|number| number.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use serde_json::json;

    fn response(code: u16, body: Value) -> HttpResponse {
        HttpResponse::new(code, HashMap::new(), body)
    }

    fn identity(fields: &Fields) -> Result<Fields, ModelError> {
        Ok(fields.clone())
    }

    #[test]
    fn test_extract_data_rejects_bare_arrays_for_any_status() {
        let parser = ResponseParser::default();
        for code in [200, 204, 404] {
            let resp = response(code, json!([{"id": 1}]));
            let result = parser.extract_data(&resp);
            assert!(matches!(
                result,
                Err(ResourceError::MalformedResponseBody { ref reason }) if reason.contains("bare array")
            ));
        }
    }

    #[test]
    fn test_extract_data_rejects_non_objects() {
        let parser = ResponseParser::default();
        for body in [json!("text"), json!(3), json!(null), json!(true)] {
            assert!(parser.extract_data(&response(200, body)).is_err());
        }
        assert!(parser.extract_data(&response(200, json!({}))).is_ok());
    }

    #[test]
    fn test_entity_builds_from_data_object() {
        let parser = ResponseParser::default();
        let entity = parser
            .entity(&response(200, json!({"data": {"id": 1}})), identity)
            .unwrap();
        assert_eq!(entity.get("id"), Some(&json!(1)));
    }

    #[test]
    fn test_entity_rejects_non_object_data() {
        let parser = ResponseParser::default();
        for data in [json!([1]), json!("x"), json!(0)] {
            let result = parser.entity(&response(200, json!({ "data": data })), identity);
            assert!(matches!(
                result,
                Err(ResourceError::MalformedResponseBody { .. })
            ));
        }
    }

    #[test]
    fn test_entity_without_data_builds_from_empty_fields() {
        let parser = ResponseParser::default();
        for body in [json!({}), json!({"data": null}), json!({"page": 1})] {
            let entity = parser.entity(&response(201, body), identity).unwrap();
            assert!(entity.data().is_empty());
        }
    }

    #[test]
    fn test_entity_propagates_model_errors() {
        let parser = ResponseParser::default();
        let result = parser.entity(&response(200, json!({"data": {}})), |_| {
            Err::<Fields, _>(ModelError::NotAnObject {
                found: "x".to_string(),
            })
        });
        assert!(matches!(result, Err(ResourceError::Model(_))));
    }

    #[test]
    fn test_collection_reads_data_and_root_pagination() {
        let parser = ResponseParser::default();
        let body = json!({
            "data": [{"id": 1}, {"id": 2}],
            "page": 2,
            "perPage": "10",
            "nextPage": 3,
            "prevPage": 1
        });

        let collection = parser.collection(&response(200, body), identity).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection[1].get("id"), Some(&json!(2)));

        let pagination = collection.pagination();
        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.per_page, Some(10));
        assert_eq!(pagination.next_page, Some(3));
        assert_eq!(pagination.prev_page, Some(1));
        assert_eq!(pagination.from, None);
    }

    #[test]
    fn test_collection_fails_when_one_element_fails() {
        let parser = ResponseParser::default();
        let body = json!({"data": [{"id": 1}, "oops"]});
        assert!(parser.collection(&response(200, body), identity).is_err());

        let body = json!({"data": {"id": 1}});
        assert!(parser.collection(&response(200, body), identity).is_err());
    }

    #[test]
    fn test_pagination_absent_fields_are_none() {
        let parser = ResponseParser::default();
        let pagination = parser.extract_pagination(&response(200, json!({"data": []})));
        assert!(pagination.is_empty());

        let pagination = parser.extract_pagination(&response(200, json!([1, 2])));
        assert!(pagination.is_empty());
    }

    #[test]
    fn test_pagination_coercion() {
        let parser = ResponseParser::default();
        let body = json!({
            "page": "2",
            "perPage": 0,
            "prevPage": "abc",
            "nextPage": 3.7,
            "from": -5,
            "to": ""
        });
        let pagination = parser.extract_pagination(&response(200, body));

        assert_eq!(pagination.page, Some(2));
        assert_eq!(pagination.per_page, None);
        assert_eq!(pagination.prev_page, None);
        assert_eq!(pagination.next_page, Some(3));
        assert_eq!(pagination.from, None);
        assert_eq!(pagination.to, None);
    }

    #[test]
    fn test_validation_takes_first_message() {
        let parser = ResponseParser::default();
        let raw = json!({"name": ["e1", "e2"], "age": ["e3"]});

        let errors = parser.validation(&raw, Fields::clone);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some("e1"));
        assert_eq!(errors.get("age"), Some("e3"));
    }

    #[test]
    fn test_validation_applies_name_mapping() {
        let parser = ResponseParser::default();
        let raw = json!({"first_name": ["required"]});

        let errors = parser.validation(&raw, |fields| {
            fields
                .iter()
                .map(|(k, v)| (k.replace("first_name", "firstName"), v.clone()))
                .collect()
        });
        assert_eq!(errors.get("firstName"), Some("required"));
    }

    #[test]
    fn test_validation_tolerates_malformed_input() {
        let parser = ResponseParser::default();
        assert!(parser.validation(&json!([1]), Fields::clone).is_empty());

        let raw = json!({
            "a": "plain",
            "b": [],
            "c": [{"code": 1}],
            "d": null,
            "e": [null, "late"]
        });
        let errors = parser.validation(&raw, Fields::clone);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("a"), Some("plain"));
        assert_eq!(errors.get("b"), None);
        assert_eq!(errors.get("c"), Some(r#"{"code":1}"#));
        assert_eq!(errors.get("d"), None);
        assert_eq!(errors.get("e"), None);
    }

    #[test]
    fn test_custom_data_key() {
        let parser = ResponseParser::new().data_key("items");
        let body = json!({"items": [{"id": 1}]});
        assert_eq!(parser.data_key_name(), "items");
        assert_eq!(parser.collection(&response(200, body), identity).unwrap().len(), 1);
    }
}
