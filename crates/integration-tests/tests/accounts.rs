//! Customer account tests. Passwords must never appear in a response.

use axum::http::StatusCode;
use serde_json::{Value, json};

use customer_desk_integration_tests::{TestApp, create_customer};

fn assert_no_secrets(account: &Value) {
    let object = account.as_object().expect("account object");
    assert!(!object.contains_key("password"), "{account}");
    assert!(!object.contains_key("password_hash"), "{account}");
}

#[tokio::test]
async fn test_create_account_hides_password() {
    let app = TestApp::new();
    let customer_id = create_customer(&app, "Ann").await;

    let (status, body) = app
        .post(
            "/customer_accounts",
            &json!({"customer_id": customer_id, "username": "ann", "password": "s3cret"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Customer account created successfully");
    assert_eq!(
        body["account"],
        json!({"id": 1, "customer_id": customer_id, "username": "ann"})
    );
    assert!(!body.to_string().contains("s3cret"));
}

#[tokio::test]
async fn test_reads_hide_password() {
    let app = TestApp::new();
    let customer_id = create_customer(&app, "Bob").await;
    app.post(
        "/customer_accounts",
        &json!({"customer_id": customer_id, "username": "bob", "password": "pw"}),
    )
    .await;

    let (status, account) = app.get("/customer_accounts/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_no_secrets(&account);

    let (_, list) = app.get("/customer_accounts").await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_no_secrets(&list[0]);
}

#[tokio::test]
async fn test_account_for_missing_customer_is_404() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/customer_accounts",
            &json!({"customer_id": 42, "username": "ghost", "password": "pw"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Customer not found"}));
    assert_eq!(app.get("/customer_accounts").await.1, json!([]));
}

#[tokio::test]
async fn test_update_username_and_password() {
    let app = TestApp::new();
    let customer_id = create_customer(&app, "Cy").await;
    app.post(
        "/customer_accounts",
        &json!({"customer_id": customer_id, "username": "cy", "password": "old"}),
    )
    .await;

    let (status, body) = app
        .put(
            "/customer_accounts/1",
            &json!({"username": "cy2", "password": "new"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Customer account updated successfully");
    assert_eq!(body["account"]["username"], "cy2");
    assert_eq!(body["account"]["customer_id"], customer_id);
    assert_no_secrets(&body["account"]);
}

#[tokio::test]
async fn test_delete_account() {
    let app = TestApp::new();
    let customer_id = create_customer(&app, "Di").await;
    app.post(
        "/customer_accounts",
        &json!({"customer_id": customer_id, "username": "di", "password": "pw"}),
    )
    .await;

    let (status, body) = app.delete("/customer_accounts/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"message": "Customer account deleted successfully"})
    );
    assert_eq!(
        app.get("/customer_accounts/1").await,
        (
            StatusCode::NOT_FOUND,
            json!({"error": "Customer account not found"})
        )
    );

    // The customer is free to go once the account is gone
    let (status, _) = app.delete(&format!("/customers/{customer_id}")).await;
    assert_eq!(status, StatusCode::OK);
}
