//! Integration tests for Customer Desk.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests against the in-memory store
//! cargo test -p customer-desk-integration-tests
//!
//! # Also run the tests that need a live server or database
//! DESK_BASE_URL=http://localhost:5000 \
//! DESK_DATABASE_URL=postgres://localhost/customer_desk_test \
//!     cargo test -p customer-desk-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `customers`, `accounts`, `products`, `orders` - per-resource behaviour
//! - `errors` - status codes and error bodies shared by every resource
//! - `live` - smoke tests over HTTP and against `PostgreSQL` (ignored by default)

pub mod store;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use customer_desk_server::cache::ResponseCache;
use customer_desk_server::db::{MemoryStore, RecordStore};
use customer_desk_server::{AppState, build_router};

pub use store::StalledListStore;

const BODY_LIMIT: usize = 1024 * 1024;

/// The full router over a fresh store, driven in-process.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// App over an empty in-memory store with a long cache TTL, so any fresh
    /// read after a write proves the write invalidated the cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn with_store(store: Arc<dyn RecordStore>) -> Self {
        let cache = ResponseCache::new(Duration::from_secs(3600), 1000);
        Self {
            router: build_router(AppState::new(store, cache)),
        }
    }

    /// Send a request with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response is not JSON.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");
        self.dispatch(request).await
    }

    /// Send raw bytes with the given content type.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the response is not JSON.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: &str,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .expect("valid request");
        self.dispatch(request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("readable body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("JSON response body")
        };
        (status, body)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a customer and return its ID.
///
/// # Panics
///
/// Panics if the create does not succeed.
pub async fn create_customer(app: &TestApp, name: &str) -> i64 {
    let (status, body) = app
        .post(
            "/customers",
            &serde_json::json!({
                "name": name,
                "email": format!("{}@example.com", name.to_lowercase()),
                "phone_number": "555-0100",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["customer"]["id"].as_i64().expect("customer id")
}

/// Create a product and return its ID.
///
/// # Panics
///
/// Panics if the create does not succeed.
pub async fn create_product(app: &TestApp, name: &str, price: f64, stock_level: i32) -> i64 {
    let (status, body) = app
        .post(
            "/products",
            &serde_json::json!({
                "name": name,
                "price": price,
                "stock_level": stock_level,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["product"]["id"].as_i64().expect("product id")
}
