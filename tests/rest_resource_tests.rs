//! Integration tests for resources driven through an in-memory transport.
//!
//! These tests cover the full pipeline: intent formatting, the transport
//! exchange, envelope parsing, model construction with nested resources,
//! and validation-error recovery.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rest_mapper::clients::{HttpResponse, HttpResponseError, RequestDescriptor, Transport};
use rest_mapper::rest::{
    Collection, Diagnostic, Diagnostics, FieldMap, Fields, MapDirection, Model, ModelError,
    ModelFill, Pagination, PaginationField, RequestFormatter, RequestIntent, Resource,
    ResourceConfig, ResourceError, ResponseParser,
};
use rest_mapper::{HttpMethod, TransportError};
use serde_json::{json, Value};

// ============================================================================
// Test Transport and Models
// ============================================================================

/// Replays queued responses and records every request it receives.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<Vec<(u16, Value)>>,
    requests: Mutex<Vec<(String, RequestDescriptor)>>,
}

impl ScriptedTransport {
    fn replying(code: u16, body: Value) -> Self {
        let transport = Self::default();
        transport.responses.lock().unwrap().push((code, body));
        transport
    }

    fn requests(&self) -> Vec<(String, RequestDescriptor)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn send(
        &self,
        url: &str,
        descriptor: RequestDescriptor,
    ) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), descriptor));

        let (code, body) = self.responses.lock().unwrap().remove(0);
        if (200..300).contains(&code) {
            return Ok(HttpResponse::new(code, HashMap::new(), body));
        }
        Err(TransportError::Response(HttpResponseError {
            code,
            body,
            message: format!("HTTP {code}"),
            error_reference: None,
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Address {
    street: Option<String>,
    zip: Option<String>,
}

impl Model for Address {
    fn from_fields(fields: &Fields) -> Result<Self, ModelError> {
        let fill = ModelFill::new(fields);
        Ok(Self {
            street: fill.string("street"),
            zip: fill.string("zipCode"),
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("street".to_string(), json!(self.street));
        fields.insert("zipCode".to_string(), json!(self.zip));
        fields
    }
}

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: Option<i64>,
    first_name: Option<String>,
    is_admin: Option<bool>,
    created_at: Option<DateTime<Utc>>,
    roles: Option<Vec<Value>>,
    address: Option<Address>,
    display: String,
}

impl Model for User {
    fn from_fields(fields: &Fields) -> Result<Self, ModelError> {
        let fill = ModelFill::new(fields);
        Ok(Self {
            id: fill.integer("id")?,
            first_name: fill.string("firstName"),
            is_admin: fill.boolean("isAdmin"),
            created_at: fill.date("createdAt"),
            roles: fill.array("roles"),
            address: fill.model::<Address>("address")?,
            display: String::new(),
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), json!(self.id));
        fields.insert("firstName".to_string(), json!(self.first_name));
        fields.insert("isAdmin".to_string(), json!(self.is_admin));
        fields.insert(
            "createdAt".to_string(),
            json!(self.created_at.map(|date| date.to_rfc3339())),
        );
        fields.insert("roles".to_string(), json!(self.roles));
        fields.insert(
            "address".to_string(),
            self.address
                .as_ref()
                .map_or(Value::Null, |address| Value::Object(address.to_fields())),
        );
        fields
    }

    fn init(&mut self) {
        self.display = self.first_name.clone().unwrap_or_default();
    }
}

fn addresses() -> Arc<Resource<Address>> {
    Arc::new(Resource::new(
        ResourceConfig::builder()
            .base_url("/addresses")
            .field_map(FieldMap::from([("zip_code", "zipCode")]))
            .build()
            .unwrap(),
    ))
}

fn users() -> Resource<User> {
    Resource::new(
        ResourceConfig::builder()
            .base_url("/users")
            .field_map(
                FieldMap::new()
                    .with("first_name", "firstName")
                    .with("is_admin", "isAdmin")
                    .with("created_at", "createdAt"),
            )
            .nested("address", addresses())
            .build()
            .unwrap(),
    )
}

/// Users whose address travels as `home_address` on the wire.
fn profiles() -> Resource<User> {
    Resource::new(
        ResourceConfig::builder()
            .base_url("/profiles")
            .field_map(
                FieldMap::new()
                    .with("first_name", "firstName")
                    .with("home_address", "address"),
            )
            .nested("address", addresses())
            .build()
            .unwrap(),
    )
}

fn wire_user(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "first_name": name,
        "is_admin": false,
        "created_at": "2024-01-02T03:04:05+00:00",
        "roles": ["reader"],
        "address": {"street": "Main St", "zip_code": "0150"}
    })
}

// ============================================================================
// Model Construction
// ============================================================================

#[test]
fn test_make_model_maps_names_and_coerces_values() {
    let users = users();
    let raw = wire_user(1, "Ada");

    let user = users.make_model(raw.as_object().unwrap()).unwrap();

    assert_eq!(user.id, Some(1));
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert_eq!(user.is_admin, Some(false));
    assert_eq!(
        user.created_at.map(|date| date.timestamp()),
        Some(1_704_164_645)
    );
    assert_eq!(user.roles, Some(vec![json!("reader")]));
    assert_eq!(
        user.address,
        Some(Address {
            street: Some("Main St".to_string()),
            zip: Some("0150".to_string()),
        })
    );
    assert_eq!(user.display, "Ada");
}

#[test]
fn test_make_raw_entity_is_the_inverse_of_make_model() {
    let users = users();
    let raw = wire_user(1, "Ada");

    let user = users.make_model(raw.as_object().unwrap()).unwrap();
    let back = users.make_raw_entity(&user).unwrap();

    assert_eq!(Value::Object(back), raw);
}

#[test]
fn test_renamed_relation_expands_through_nested_resource() {
    let profiles = profiles();
    let raw = json!({
        "id": 7,
        "first_name": "Ada",
        "home_address": {"street": "Main St", "zip_code": "0150"}
    });

    let user = profiles.make_model(raw.as_object().unwrap()).unwrap();
    assert_eq!(
        user.address,
        Some(Address {
            street: Some("Main St".to_string()),
            zip: Some("0150".to_string()),
        })
    );

    let back = profiles.make_raw_entity(&user).unwrap();
    assert_eq!(back.get("home_address"), raw.get("home_address"));
    assert_eq!(back.get("first_name"), Some(&json!("Ada")));
    assert!(!back.contains_key("address"));
}

#[test]
fn test_map_round_trip_restores_mapped_keys() {
    let users = users();
    let raw = json!({"first_name": "Ada", "unmapped": true});
    let raw = raw.as_object().unwrap();

    let local = users.map(raw, MapDirection::Forward, None);
    assert!(local.contains_key("firstName"));
    assert_eq!(local.get("unmapped"), Some(&json!(true)));

    let wire = users.map(&local, MapDirection::Reverse, None);
    assert_eq!(&wire, raw);
}

#[test]
fn test_clone_with_overrides_fields_and_reruns_init() {
    let users = users();
    let user = users
        .make_model(wire_user(1, "Ada").as_object().unwrap())
        .unwrap();

    let mut updates = Fields::new();
    updates.insert("firstName".to_string(), json!("Grace"));
    let renamed = user.clone_with(updates).unwrap();

    assert_eq!(renamed.first_name.as_deref(), Some("Grace"));
    assert_eq!(renamed.display, "Grace");
    assert_eq!(renamed.address, user.address);
}

// ============================================================================
// Default Operations
// ============================================================================

#[tokio::test]
async fn test_view_fetches_one_entity() {
    let users = users();
    let transport = ScriptedTransport::replying(200, json!({"data": wire_user(5, "Ada")}));

    let entity = users
        .view(&transport, 5, RequestIntent::new().token("t0k3n"))
        .await
        .unwrap();
    assert_eq!(entity.id, Some(5));

    let requests = transport.requests();
    let (url, descriptor) = &requests[0];
    assert_eq!(url, "/users/5");
    assert_eq!(descriptor.method, HttpMethod::Get);
    assert_eq!(descriptor.headers.get("Authorization"), Some("Bearer t0k3n"));
}

#[tokio::test]
async fn test_list_returns_collection_with_root_pagination() {
    let users = users();
    let transport = ScriptedTransport::replying(
        200,
        json!({
            "data": [wire_user(1, "Ada"), wire_user(2, "Grace")],
            "page": "2",
            "perPage": 2,
            "prevPage": 1,
            "nextPage": null
        }),
    );

    let intent = RequestIntent::new()
        .pagination(Pagination {
            page: Some(2),
            per_page: Some(2),
            ..Pagination::default()
        })
        .fields(["firstName", "createdAt"]);
    let collection: Collection<User> = users.list(&transport, intent).await.unwrap();

    assert_eq!(collection.len(), 2);
    assert_eq!(collection[1].first_name.as_deref(), Some("Grace"));
    assert_eq!(collection.pagination().page, Some(2));
    assert_eq!(collection.pagination().per_page, Some(2));
    assert_eq!(
        collection.pagination().get(PaginationField::PrevPage),
        Some(1)
    );
    assert_eq!(collection.pagination().next_page, None);

    let requests = transport.requests();
    let (url, descriptor) = &requests[0];
    assert_eq!(url, "/users");
    assert_eq!(descriptor.search.get("page"), Some("2"));
    assert_eq!(descriptor.search.get("perPage"), Some("2"));
    assert_eq!(descriptor.search.get("fields"), Some("first_name,created_at"));
}

#[tokio::test]
async fn test_list_rejects_bare_array_root() {
    let users = users();
    let transport = ScriptedTransport::replying(200, json!([wire_user(1, "Ada")]));

    let result = users.list(&transport, RequestIntent::new()).await;
    assert!(matches!(
        result,
        Err(ResourceError::MalformedResponseBody { .. })
    ));
}

#[tokio::test]
async fn test_create_posts_raw_entity_and_parses_result() {
    let users = users();
    let transport = ScriptedTransport::replying(201, json!({"data": wire_user(9, "Ada")}));
    let new_user = users
        .make_model(wire_user(0, "Ada").as_object().unwrap())
        .unwrap();

    let created = users
        .create(&transport, &new_user, RequestIntent::new())
        .await
        .unwrap();
    assert_eq!(created.id, Some(9));

    let requests = transport.requests();
    let (url, descriptor) = &requests[0];
    assert_eq!(url, "/users");
    assert_eq!(descriptor.method, HttpMethod::Post);
    assert_eq!(descriptor.body, Some(wire_user(0, "Ada")));
}

#[tokio::test]
async fn test_create_converts_422_into_validation_errors() {
    let users = users();
    let transport = ScriptedTransport::replying(
        422,
        json!({
            "first_name": ["is too short", "is reserved"],
            "is_admin": ["cannot be set"]
        }),
    );
    let new_user = users
        .make_model(wire_user(0, "A").as_object().unwrap())
        .unwrap();

    let result = users
        .create(&transport, &new_user, RequestIntent::new())
        .await;

    match result {
        Err(ResourceError::ValidationFailed(errors)) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors.get("firstName"), Some("is too short"));
            assert_eq!(errors.get("isAdmin"), Some("cannot be set"));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_with_empty_success_body_builds_empty_entity() {
    let users = users();
    let transport = ScriptedTransport::replying(201, json!({}));
    let new_user = users
        .make_model(wire_user(0, "Ada").as_object().unwrap())
        .unwrap();

    let created = users
        .create(&transport, &new_user, RequestIntent::new())
        .await
        .unwrap();

    assert_eq!(created.id, None);
    assert_eq!(created.first_name, None);
    assert_eq!(created.address, None);
    assert_eq!(created.display, "");
}

#[tokio::test]
async fn test_create_validation_round_trip_through_renamed_relation() {
    let profiles = profiles();
    let transport = ScriptedTransport::replying(
        422,
        json!({
            "home_address": ["is incomplete"],
            "first_name": ["is blank"]
        }),
    );
    let new_user = profiles
        .make_model(
            json!({"first_name": "", "home_address": {"zip_code": "0150"}})
                .as_object()
                .unwrap(),
        )
        .unwrap();

    let result = profiles
        .create(&transport, &new_user, RequestIntent::new())
        .await;

    match result {
        Err(ResourceError::ValidationFailed(errors)) => {
            assert_eq!(errors.get("address"), Some("is incomplete"));
            assert_eq!(errors.get("firstName"), Some("is blank"));
        }
        other => panic!("expected validation errors, got {other:?}"),
    }

    let requests = transport.requests();
    let body = requests[0].1.body.clone().unwrap();
    assert_eq!(
        body.get("home_address"),
        Some(&json!({"street": null, "zip_code": "0150"}))
    );
}

#[tokio::test]
async fn test_other_failures_propagate_unchanged() {
    let users = users();
    let transport = ScriptedTransport::replying(500, json!({"error": "boom"}));
    let user = users
        .make_model(wire_user(3, "Ada").as_object().unwrap())
        .unwrap();

    let result = users
        .update(&transport, &user, "id", RequestIntent::new())
        .await;

    match result {
        Err(ResourceError::Transport(TransportError::Response(response))) => {
            assert_eq!(response.code, 500);
            assert_eq!(response.body, json!({"error": "boom"}));
        }
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_caller_intent_overrides_default_method() {
    let users = users();
    let transport = ScriptedTransport::replying(200, json!({"data": wire_user(3, "Ada")}));
    let user = users
        .make_model(wire_user(3, "Ada").as_object().unwrap())
        .unwrap();

    users
        .update(&transport, &user, "id", RequestIntent::new().method("patch"))
        .await
        .unwrap();

    let requests = transport.requests();
    let (url, descriptor) = &requests[0];
    assert_eq!(url, "/users/3");
    assert_eq!(descriptor.method, HttpMethod::Patch);
}

#[tokio::test]
async fn test_delete_returns_decoded_body() {
    let users = users();
    let transport = ScriptedTransport::replying(200, json!({"deleted": true}));
    let user = users
        .make_model(wire_user(4, "Ada").as_object().unwrap())
        .unwrap();

    let body = users
        .delete(&transport, &user, "id", RequestIntent::new())
        .await
        .unwrap();

    assert_eq!(body, json!({"deleted": true}));
    assert_eq!(transport.requests()[0].0, "/users/4");
}

// ============================================================================
// Send and Custom Configuration
// ============================================================================

#[tokio::test]
async fn test_send_without_base_url_and_custom_parser() {
    let resource: Resource<Fields> = Resource::new(
        ResourceConfig::builder()
            .base_url("/ignored")
            .formatter(RequestFormatter::new().expand_param(Some("with")))
            .parser(ResponseParser::new().data_key("result"))
            .build()
            .unwrap(),
    );
    let transport = ScriptedTransport::replying(200, json!({"result": {"ok": 1}}));

    let response = resource
        .send(
            &transport,
            RequestIntent::new().expand(["owner"]),
            "https://other.example.com/status",
            false,
        )
        .await
        .unwrap();
    let entity = resource.map_entity()(&response).unwrap();
    assert_eq!(entity.get("ok"), Some(&json!(1)));

    let requests = transport.requests();
    let (url, descriptor) = &requests[0];
    assert_eq!(url, "https://other.example.com/status");
    assert_eq!(descriptor.search.get("with"), Some("owner"));
}

#[test]
fn test_collection_from_non_sequence_reports_diagnostic() {
    let mut diagnostics = Diagnostics::new();
    let collection =
        Collection::from_value(json!("not a list"), Pagination::default(), &mut diagnostics);

    assert_eq!(collection.data(), &[json!("not a list")]);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(Diagnostic::NonSequenceCollection { .. })
    ));
}
