//! Customer resource tests against the in-memory store.

use axum::http::StatusCode;
use serde_json::json;

use customer_desk_integration_tests::{TestApp, create_customer};

#[tokio::test]
async fn test_create_assigns_sequential_ids() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/customers",
            &json!({"name": "Ann", "email": "a@x.com", "phone_number": "555-1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Customer created successfully");
    assert_eq!(
        body["customer"],
        json!({"id": 1, "name": "Ann", "email": "a@x.com", "phone_number": "555-1"})
    );

    let (status, body) = app
        .post(
            "/customers",
            &json!({"name": "Bob", "email": "b@x.com", "phone_number": "555-2"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["customer"]["id"], 2);
}

#[tokio::test]
async fn test_created_customer_is_retrievable() {
    let app = TestApp::new();
    let id = create_customer(&app, "Carol").await;

    let (status, body) = app.get(&format!("/customers/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Carol");
    assert_eq!(body["email"], "carol@example.com");

    let (status, body) = app.get("/customers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], id);
}

#[tokio::test]
async fn test_partial_update_keeps_omitted_fields() {
    let app = TestApp::new();
    let id = create_customer(&app, "Dan").await;

    let (status, body) = app
        .put(&format!("/customers/{id}"), &json!({"phone_number": "555-9999"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer updated successfully");
    assert_eq!(
        body["customer"],
        json!({
            "id": id,
            "name": "Dan",
            "email": "dan@example.com",
            "phone_number": "555-9999",
        })
    );
}

#[tokio::test]
async fn test_update_is_visible_to_cached_reads() {
    let app = TestApp::new();
    let id = create_customer(&app, "Eve").await;
    let uri = format!("/customers/{id}");

    // Warm both cache entries
    app.get(&uri).await;
    app.get("/customers").await;

    app.put(&uri, &json!({"name": "Evelyn"})).await;

    let (_, record) = app.get(&uri).await;
    let (_, list) = app.get("/customers").await;
    assert_eq!(record["name"], "Evelyn");
    assert_eq!(list[0]["name"], "Evelyn");
}

#[tokio::test]
async fn test_delete_then_get_is_404() {
    let app = TestApp::new();
    let id = create_customer(&app, "Fay").await;
    let uri = format!("/customers/{id}");

    // Cached before the delete
    assert_eq!(app.get(&uri).await.0, StatusCode::OK);

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Customer deleted successfully"}));

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Customer not found"}));

    let (_, list) = app.get("/customers").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let app = TestApp::new();
    let first = create_customer(&app, "Gus").await;
    app.delete(&format!("/customers/{first}")).await;

    let second = create_customer(&app, "Hal").await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_customer_with_account_cannot_be_deleted() {
    let app = TestApp::new();
    let id = create_customer(&app, "Ivy").await;
    app.post(
        "/customer_accounts",
        &json!({"customer_id": id, "username": "ivy", "password": "pw"}),
    )
    .await;

    let (status, body) = app.delete(&format!("/customers/{id}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    assert_eq!(app.get(&format!("/customers/{id}")).await.0, StatusCode::OK);
}
