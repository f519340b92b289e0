//! HTTP tests for the registration and health endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::DatabaseConfig;
use user_service_lib::{build_state, http::create_router, infra::Database};

async fn build_app() -> Router {
    let database = Database::connect(&DatabaseConfig::sqlite_memory())
        .await
        .expect("in-memory database");
    create_router(build_state(database))
}

fn register_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn grace() -> Value {
    json!({
        "username": "grace",
        "password1": "cobol59",
        "password2": "cobol59",
        "email": "grace@navy.MIL",
        "first_name": "Grace",
        "last_name": "Hopper"
    })
}

#[tokio::test]
async fn test_register_created() {
    let app = build_app().await;

    let (status, body) = send(&app, register_request(&grace())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "grace");
    assert_eq!(body["email"], "grace@navy.mil");
    assert_eq!(body["first_name"], "Grace");
    assert_eq!(body["last_name"], "Hopper");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("id").is_some());
}

#[tokio::test]
async fn test_register_validation_errors() {
    let app = build_app().await;
    let payload = json!({
        "username": "grace hopper",
        "password1": "cobol59",
        "password2": "fortran",
        "email": "not-an-email"
    });

    let (status, body) = send(&app, register_request(&payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let fields = &body["error"]["fields"];
    assert_eq!(fields["username"][0], r#"Only A-Z, 0-9, "_", "-", and "." allowed."#);
    assert_eq!(fields["password2"][0], "Passwords must match");
    assert_eq!(fields["email"][0], "Enter a valid email address.");
    assert!(fields.get("first_name").is_none());
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = build_app().await;

    let (status, body) = send(&app, register_request(&json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["username", "password1", "password2", "email"] {
        assert_eq!(body["error"]["fields"][field][0], "This field is required.");
    }
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = build_app().await;
    let (status, _) = send(&app, register_request(&grace())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, register_request(&grace())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Sorry, this username is taken.");
    assert_eq!(
        body["error"]["fields"]["username"],
        json!(["Sorry, this username is taken."])
    );
}

#[tokio::test]
async fn test_register_malformed_json() {
    let app = build_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_health() {
    let app = build_app().await;
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}
