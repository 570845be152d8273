//! Common test utilities for integration tests.
//!
//! The router is exercised in-process with `tower::ServiceExt::oneshot`
//! against an in-memory todo store, so no database is required.

// Helpers are shared by several test binaries; not every binary uses all of them.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use mongodb::{options::ClientOptions, Client};
use persistence::repositories::{InMemoryTodoRepository, MongoTodoRepository, TodoRepository};
use std::sync::Arc;
use todo_api::{app::create_app, config::Config};
use tower::ServiceExt;

/// Test configuration: in-memory backend, metrics off.
pub fn test_config() -> Config {
    Config::load_with_overrides(&[
        ("server.host", "127.0.0.1"),
        ("database.backend", "memory"),
        ("logging.level", "debug"),
        ("logging.format", "pretty"),
        ("metrics.enabled", "false"),
    ])
    .expect("Failed to build test config")
}

/// Create a test application backed by a fresh in-memory store.
pub fn create_test_app() -> Router {
    create_app(test_config(), Arc::new(InMemoryTodoRepository::new()))
}

/// Create a test application over the given store.
pub fn create_test_app_with(todos: Arc<dyn TodoRepository>) -> Router {
    create_app(test_config(), todos)
}

/// A MongoDB repository pointed at a port nothing listens on.
///
/// The driver connects lazily, so construction succeeds and every operation
/// fails after the (short) server selection timeout.
pub async fn unreachable_repository() -> Arc<dyn TodoRepository> {
    let options = ClientOptions::parse(
        "mongodb://127.0.0.1:1/todo_test?serverSelectionTimeoutMS=200&connectTimeoutMS=200",
    )
    .await
    .expect("Failed to parse MongoDB URI");
    let client = Client::with_options(options).expect("Failed to build MongoDB client");
    Arc::new(MongoTodoRepository::new(client.database("todo_test"), "todos"))
}

/// Build a JSON request.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Build a request with a raw (possibly malformed) JSON body.
pub fn raw_json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a GET request.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Build a DELETE request.
pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to parse JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Helper to read a response body as text.
pub async fn response_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Create a todo via the API and return its JSON representation.
pub async fn create_test_todo(app: &Router, title: &str) -> serde_json::Value {
    let request = json_request(
        Method::POST,
        "/items",
        serde_json::json!({ "title": title }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_response_body(response).await
}
