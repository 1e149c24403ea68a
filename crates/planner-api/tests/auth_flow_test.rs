//! End-to-end account flow against a real database.
//!
//! Requires PostgreSQL at `DATABASE_URL`; ignored by default.

use std::sync::Arc;

use planner_api::{build_router, AppState, ServerConfig};
use planner_db::test_fixtures::{connect_migrated, unique_username};
use planner_inference::mock::MockGenerationBackend;
use serde_json::{json, Value};

async fn spawn_app(backend: MockGenerationBackend) -> String {
    let config = ServerConfig::default();
    let db = connect_migrated().await.expect("test database");
    let state = AppState::new(Arc::new(backend), db, &config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn register_and_login(client: &reqwest::Client, base: &str) -> (String, String) {
    let username = unique_username("flow");
    let creds = json!({ "username": username, "password": "password123" });

    let resp = client
        .post(format!("{}/api/v1/auth/register", base))
        .json(&creds)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let resp = client
        .post(format!("{}/api/v1/auth/token", base))
        .json(&creds)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 24 * 3600);

    (username, body["access_token"].as_str().unwrap().to_string())
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_register_login_extract_and_manage_todos() {
    let backend = MockGenerationBackend::new().with_fixed_response(
        r#"{"todos":[{"title":"Buy milk"},{"title":"Dentist","due_time":"15:00"}]}"#,
    );
    let base = spawn_app(backend).await;
    let client = reqwest::Client::new();
    let (username, token) = register_and_login(&client, &base).await;

    // me
    let me: Value = client
        .get(format!("{}/api/v1/auth/me", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["username"], username);

    // Authenticated extraction saves the list.
    let resp = client
        .post(format!("{}/todo-request", base))
        .bearer_auth(&token)
        .json(&json!({ "message": "buy milk, dentist at 3" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let saved: Vec<Value> = client
        .get(format!("{}/api/v1/todos", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0]["title"], "Buy milk");
    assert_eq!(saved[1]["due_time"], "15:00");

    // Toggle status.
    let id = saved[1]["id"].as_str().unwrap();
    let resp = client
        .patch(format!("{}/api/v1/todos/{}/status", base, id))
        .bearer_auth(&token)
        .json(&json!({ "status": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["status"], true);

    // Replace via PUT, with one invalid item rejecting the batch.
    let resp = client
        .put(format!("{}/api/v1/todos", base))
        .bearer_auth(&token)
        .json(&json!({ "todos": [{ "title": "ok" }, { "priority": "high" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client
        .put(format!("{}/api/v1/todos", base))
        .bearer_auth(&token)
        .json(&json!({ "todos": [{ "title": "Only one", "priority": "LOW" }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let stored: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["priority"], "low");

    // Unknown todo id.
    let resp = client
        .patch(format!(
            "{}/api/v1/todos/{}/status",
            base,
            uuid::Uuid::now_v7()
        ))
        .bearer_auth(&token)
        .json(&json!({ "status": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    // Revoke, then the token stops working.
    let resp = client
        .post(format!("{}/api/v1/auth/revoke", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{}/api/v1/todos", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_duplicate_registration_and_bad_login() {
    let base = spawn_app(MockGenerationBackend::new()).await;
    let client = reqwest::Client::new();
    let (username, _) = register_and_login(&client, &base).await;

    let resp = client
        .post(format!("{}/api/v1/auth/register", base))
        .json(&json!({ "username": username.to_uppercase(), "password": "password123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);

    let resp = client
        .post(format!("{}/api/v1/auth/token", base))
        .json(&json!({ "username": username, "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Incorrect username or password");
}
