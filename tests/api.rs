//! End-to-end tests: the full router against an in-memory SQLite
//! database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use license_server::app;
use license_server::state::AppState;

/// Build the app over a fresh in-memory database. A single connection is
/// used so every request sees the same memory database.
async fn test_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    license_server::db::MIGRATOR
        .run(&pool)
        .await
        .expect("run migrations");
    app::router(AppState { db: pool })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&v).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn create_user(app: &Router, email: &str) -> String {
    let (status, body) = send(app, "POST", "/api/users", Some(json!({ "email": email }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn create_key(app: &Router, user_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/license-keys",
        Some(json!({
            "maxDevices": 2,
            "expires": "2030-01-01T00:00:00Z",
            "userId": user_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_check_works() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn hello_and_goodbye_greet_by_name() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/hello?name=Ada", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello! Ada!");

    let (status, body) = send(&app, "GET", "/api/goodbye?name=Ada", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Goodbye! Ada!");
}

#[tokio::test]
async fn greeting_requires_name() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/api/hello", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    // an empty name is still a name
    let (status, body) = send(&app, "GET", "/api/hello?name=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello! !");
}

#[tokio::test]
async fn user_crud_lifecycle() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "ada@example.com", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["email"], "ada@example.com");

    // duplicate email conflicts
    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "ada@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // lookup by id and by unique email
    let (status, body) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");

    let (status, body) = send(&app, "GET", "/api/users/by-email/ada@example.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), id);

    // patch: explicit null clears the nullable column
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/users/{id}"),
        Some(json!({ "name": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["name"].is_null());

    // delete, then 404
    let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn license_key_defaults_and_updated_at() {
    let app = test_app().await;
    let user_id = create_user(&app, "key-owner@example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/license-keys",
        Some(json!({
            "maxDevices": 5,
            "expires": "2030-06-01T00:00:00Z",
            "userId": user_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isActivated"], false);
    assert_eq!(body["isEnable"], true);
    assert_eq!(body["maxDevices"], 5);
    let key_id = body["id"].as_str().unwrap().to_string();
    let updated_at = body["updatedAt"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/license-keys/{key_id}"),
        Some(json!({ "isActivated": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isActivated"], true);
    assert_ne!(body["updatedAt"].as_str().unwrap(), updated_at);
}

#[tokio::test]
async fn license_key_requires_known_user() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/license-keys",
        Some(json!({
            "maxDevices": 1,
            "expires": "2030-01-01T00:00:00Z",
            "userId": "no-such-user"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("foreign key"));
}

#[tokio::test]
async fn device_hardware_id_unique_per_key() {
    let app = test_app().await;
    let user_id = create_user(&app, "devices@example.com").await;
    let key_a = create_key(&app, &user_id).await;
    let key_b = create_key(&app, &user_id).await;

    let device = |key: &str| {
        json!({
            "deviceHwId": "hw-123",
            "deviceName": "laptop",
            "deviceType": "desktop",
            "deviceOS": "linux",
            "licenseKeyId": key
        })
    };

    let (status, _) = send(&app, "POST", "/api/devices", Some(device(&key_a))).await;
    assert_eq!(status, StatusCode::CREATED);

    // same hardware id on the same key conflicts
    let (status, _) = send(&app, "POST", "/api/devices", Some(device(&key_a))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // but is fine on another key
    let (status, _) = send(&app, "POST", "/api/devices", Some(device(&key_b))).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn feature_names_unique_per_key() {
    let app = test_app().await;
    let user_id = create_user(&app, "features@example.com").await;
    let key_id = create_key(&app, &user_id).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/license-features",
        Some(json!({ "name": "offline-mode", "licenseKeyId": key_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_i64().unwrap() >= 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/license-features",
        Some(json!({ "name": "offline-mode", "licenseKeyId": key_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn query_endpoint_filters_sorts_and_paginates() {
    let app = test_app().await;
    for (email, name) in [
        ("a@example.com", "Alice"),
        ("b@example.com", "Bob"),
        ("c@other.org", "Carol"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/users",
            Some(json!({ "email": email, "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/query",
        Some(json!({
            "where": { "email": { "endsWith": "@example.com" } },
            "orderBy": { "email": "desc" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Bob");
    assert_eq!(rows[1]["name"], "Alice");

    // skip/take paginate
    let (status, body) = send(
        &app,
        "POST",
        "/api/users/query",
        Some(json!({ "orderBy": { "email": "asc" }, "skip": 1, "take": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Bob");
}

#[tokio::test]
async fn bare_null_name_filter_matches_unnamed_users() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "named@example.com", "name": "Named" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "email": "unnamed@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/query",
        Some(json!({ "where": { "name": null } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "unnamed@example.com");
}

#[tokio::test]
async fn query_supports_relation_filters() {
    let app = test_app().await;
    let with_key = create_user(&app, "licensed@example.com").await;
    create_user(&app, "unlicensed@example.com").await;
    create_key(&app, &with_key).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/query",
        Some(json!({
            "where": { "licenseKey": { "some": { "isEnable": true } } }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["email"], "licensed@example.com");

    // keys filtered by their owner's email
    let (status, body) = send(
        &app,
        "POST",
        "/api/license-keys/query",
        Some(json!({
            "where": { "user": { "is": { "email": "licensed@example.com" } } }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn every_relation_filter_requires_all_related_rows_to_match() {
    let app = test_app().await;

    // all_enabled: one enabled key; mixed: one enabled, one disabled;
    // keyless: no keys at all ("every" is vacuously true)
    let all_enabled = create_user(&app, "all-enabled@example.com").await;
    let mixed = create_user(&app, "mixed@example.com").await;
    create_user(&app, "keyless@example.com").await;

    create_key(&app, &all_enabled).await;
    create_key(&app, &mixed).await;
    let disabled = create_key(&app, &mixed).await;
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/license-keys/{disabled}"),
        Some(json!({ "isEnable": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users/query",
        Some(json!({
            "where": { "licenseKey": { "every": { "isEnable": true } } },
            "orderBy": { "email": "asc" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, ["all-enabled@example.com", "keyless@example.com"]);
}

#[tokio::test]
async fn query_rejects_unknown_filter_fields() {
    let app = test_app().await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/users/query",
        Some(json!({ "where": { "emial": "x" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deleting_a_key_cascades_to_devices_and_features() {
    let app = test_app().await;
    let user_id = create_user(&app, "cascade@example.com").await;
    let key_id = create_key(&app, &user_id).await;

    let (status, device) = send(
        &app,
        "POST",
        "/api/devices",
        Some(json!({
            "deviceHwId": "hw-9",
            "deviceName": "phone",
            "deviceType": "mobile",
            "deviceOS": "android",
            "licenseKeyId": key_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let device_id = device["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/api/license-features",
        Some(json!({ "name": "sync", "licenseKeyId": key_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "DELETE", &format!("/api/license-keys/{key_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/devices/{device_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        "POST",
        "/api/license-features/query",
        Some(json!({ "where": { "licenseKeyId": key_id } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn nested_listings_return_related_rows() {
    let app = test_app().await;
    let user_id = create_user(&app, "nested@example.com").await;
    let key_id = create_key(&app, &user_id).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/users/{user_id}/license-keys"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/license-keys/{key_id}/devices"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    // unknown parents are 404, not empty lists
    let (status, _) = send(&app, "GET", "/api/users/nope/license-keys", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
