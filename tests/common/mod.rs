// Shared helpers for the HTTP integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fitness_tracker::api::routes::{create_routes, AppState};
use fitness_tracker::auth::{CredentialStore, JwtService};
use fitness_tracker::repository::Repositories;

pub const TEST_SECRET: &str = "test_secret_key_for_testing_only";

/// Router backed by a fresh in-memory store
pub fn test_app() -> Router {
    let state = AppState::new(
        Repositories::in_memory(),
        JwtService::new(TEST_SECRET),
        CredentialStore::new(4),
    );
    create_routes(state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

pub async fn signup(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/users/signup",
        None,
        Some(json!({ "email": email, "name": "Test User", "password": password })),
    )
    .await
}

/// Sign up a user and return their session token
pub async fn token_for(app: &Router, email: &str) -> String {
    let (status, body) = signup(app, email, "p").await;
    assert_eq!(status, StatusCode::OK, "signup failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

pub async fn create_exercise(app: &Router, token: &str, name: &str, duration: i32) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/exercise/create",
        Some(token),
        Some(json!({ "name": name, "duration": duration, "description": "test" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "exercise create failed: {body}");
    body["exercise_id"].as_str().unwrap().to_string()
}

pub async fn create_workout(app: &Router, token: &str, name: &str, start: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/workout/create",
        Some(token),
        Some(json!({ "name": name, "start_date_time": start, "exercises": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "workout create failed: {body}");
    body["workout_id"].as_str().unwrap().to_string()
}
