//! Status codes and `{"error": ...}` bodies shared by every resource.

use axum::http::{Method, StatusCode};
use serde_json::{Map, Value, json};

use customer_desk_integration_tests::{TestApp, create_customer, create_product};

const RESOURCES: &[(&str, &str)] = &[
    ("customers", "Customer not found"),
    ("customer_accounts", "Customer account not found"),
    ("products", "Product not found"),
    ("orders", "Order not found"),
];

#[tokio::test]
async fn test_unknown_ids_are_404_for_every_kind() {
    let app = TestApp::new();

    for (collection, message) in RESOURCES {
        let uri = format!("/{collection}/77");
        let expected = (StatusCode::NOT_FOUND, json!({ "error": message }));

        assert_eq!(app.get(&uri).await, expected, "GET {uri}");
        assert_eq!(
            app.put(&uri, &json!({"status": "x", "name": "x", "username": "x"}))
                .await,
            expected,
            "PUT {uri}"
        );
        assert_eq!(app.delete(&uri).await, expected, "DELETE {uri}");
    }
}

/// Drop each required key in turn from a valid payload and expect a 400
/// naming exactly that key.
async fn assert_each_field_required(app: &TestApp, uri: &str, valid: &Value) {
    let Value::Object(fields) = valid else {
        panic!("payload must be an object");
    };

    for key in fields.keys() {
        let mut payload: Map<String, Value> = fields.clone();
        payload.remove(key);

        let (status, body) = app.post(uri, &Value::Object(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "POST {uri} without {key}");
        assert_eq!(
            body,
            json!({ "error": format!("Missing required fields: {key}") }),
            "POST {uri} without {key}"
        );
    }
}

#[tokio::test]
async fn test_missing_required_fields_are_400() {
    let app = TestApp::new();
    let customer_id = create_customer(&app, "Ann").await;
    let product_id = create_product(&app, "Lamp", 30.0, 5).await;

    assert_each_field_required(
        &app,
        "/customers",
        &json!({"name": "A", "email": "a@x.com", "phone_number": "1"}),
    )
    .await;
    assert_each_field_required(
        &app,
        "/customer_accounts",
        &json!({"customer_id": customer_id, "username": "a", "password": "pw"}),
    )
    .await;
    assert_each_field_required(
        &app,
        "/products",
        &json!({"name": "P", "price": 1.5, "stock_level": 1}),
    )
    .await;
    assert_each_field_required(
        &app,
        "/orders",
        &json!({"customer_id": customer_id, "product_id": product_id, "quantity": 1}),
    )
    .await;

    // Nothing was written by the rejected requests
    assert_eq!(app.get("/customers").await.1.as_array().map(Vec::len), Some(1));
    assert_eq!(app.get("/customer_accounts").await.1, json!([]));
    assert_eq!(app.get("/orders").await.1, json!([]));
}

#[tokio::test]
async fn test_all_missing_fields_are_listed() {
    let app = TestApp::new();

    let (status, body) = app.post("/customers", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Missing required fields: name, email, phone_number"})
    );
}

#[tokio::test]
async fn test_empty_values_count_as_present() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/customers",
            &json!({"name": "", "email": "", "phone_number": ""}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["customer"]["name"], "");
}

#[tokio::test]
async fn test_empty_update_is_400() {
    let app = TestApp::new();
    let customer_id = create_customer(&app, "Bo").await;

    let (status, body) = app
        .put(&format!("/customers/{customer_id}"), &json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No update data provided"}));
}

#[tokio::test]
async fn test_malformed_bodies_are_400() {
    let app = TestApp::new();

    let cases = [
        ("application/json", "{\"name\": "),
        ("application/json", ""),
        ("application/json", "[1, 2]"),
        ("text/plain", "name=Ann"),
    ];

    for (content_type, body) in cases {
        let (status, response) = app
            .send_raw(Method::POST, "/customers", content_type, body)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type}: {body:?}");
        assert!(response["error"].is_string(), "{response}");
    }

    let (status, response) = app.send(Method::POST, "/products", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_wrongly_typed_field_is_400() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/products",
            &json!({"name": "Lamp", "price": 3.0, "stock_level": "lots"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("Invalid field value")));
}

#[tokio::test]
async fn test_non_numeric_id_is_400() {
    let app = TestApp::new();

    let (status, body) = app.get("/customers/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid record identifier"}));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/invoices").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Resource not found"}));
}
