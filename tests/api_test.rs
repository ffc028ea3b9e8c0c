//! End-to-end tests over a live HTTP port.
//!
//! Spins up the REST server on a random port with no Gemini key and no mail
//! relay configured, then exercises the public endpoints with a real HTTP
//! client.

use fixsterd::config::{GeminiConfig, ObservabilityConfig, ServerConfig, SupportConfig};
use fixsterd::{rest, AppContext};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn test_config(dir: &TempDir, port: u16) -> ServerConfig {
    ServerConfig {
        port,
        data_dir: dir.path().to_path_buf(),
        log: "error".to_string(),
        bind_address: "127.0.0.1".to_string(),
        log_format: "pretty".to_string(),
        gemini: GeminiConfig {
            api_key: None,
            ..GeminiConfig::default()
        },
        support: SupportConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

/// Start the server in the background and return its base URL.
async fn spawn_server(dir: &TempDir) -> String {
    let port = find_free_port();
    let ctx = Arc::new(AppContext::init(test_config(dir, port)).await.unwrap());

    tokio::spawn(async move {
        let _ = rest::serve(ctx).await;
    });

    // Give the server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    format!("http://127.0.0.1:{port}")
}

async fn post(base: &str, path: &str, body: Value) -> (u16, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

async fn get(base: &str, path: &str) -> (u16, Value) {
    let resp = reqwest::get(format!("{base}{path}")).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

// ─── Gateway endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_debug_without_code_is_400() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = post(&base, "/debug", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No code provided");

    // An empty string counts as missing, same as the absent field.
    let (status, _) = post(&base, "/debug", json!({ "code": "" })).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_debug_without_key_returns_canned_string() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = post(&base, "/debug", json!({ "code": "function f(){return}" })).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["output"],
        "Error: Gemini API key is not configured. Please check server settings."
    );
}

#[tokio::test]
async fn test_chat_validation_and_fallback() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = post(&base, "/chat", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No message provided");

    let (status, body) = post(&base, "/chat", json!({ "message": "hello" })).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["output"],
        "Error: Gemini API key is not configured. Please check your environment variables."
    );
}

#[tokio::test]
async fn test_run_code_validation_and_fallback() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = post(&base, "/run-code", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No code provided");

    let (status, body) = post(&base, "/run-code", json!({ "code": "print(1)", "language": "python" })).await;
    assert_eq!(status, 200);
    let output = body["output"].as_str().unwrap();
    // The canned fallback keeps the three-section shape the UI parses.
    assert!(output.starts_with("Output:\n"));
    assert!(output.contains("Errors or Warnings:\n"));
    assert!(output.contains("Explanation:\n"));
    assert!(output.contains("API key not configured"));
}

#[tokio::test]
async fn test_support_requires_fields_and_config() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = post(&base, "/support", json!({ "email": "a@b.c" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Email and message are required");

    let (status, body) = post(
        &base,
        "/support",
        json!({ "email": "a@b.c", "message": "it broke" }),
    )
    .await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Email service not configured");
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = get(&base, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].is_number());
}

// ─── Project endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_project_crud_round_trip() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    // Empty to start.
    let (status, body) = get(&base, "/api/v1/users/alice/projects").await;
    assert_eq!(status, 200);
    assert_eq!(body["projects"].as_array().unwrap().len(), 0);

    // Create, then list.
    let (status, created) = post(
        &base,
        "/api/v1/users/alice/projects",
        json!({ "name": "Parser", "description": "Fix my parser" }),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(created["name"], "Parser");
    assert_eq!(created["userId"], "alice");
    assert_eq!(created["status"], "In Progress");
    assert_eq!(created["chatHistory"].as_array().unwrap().len(), 0);
    assert_eq!(created["createdAt"], created["updatedAt"]);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, body) = get(&base, "/api/v1/users/alice/projects").await;
    let projects = body["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["description"], "Fix my parser");

    // Append a message.
    let (status, after) = post(
        &base,
        &format!("/api/v1/users/alice/projects/{id}/messages"),
        json!({ "text": "why does this fail?", "sender": "user", "type": "code" }),
    )
    .await;
    assert_eq!(status, 200);
    let history = after["chatHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["sender"], "user");
    assert_eq!(history[0]["type"], "code");

    // Update status via PATCH.
    let resp = reqwest::Client::new()
        .patch(format!("{base}/api/v1/users/alice/projects/{id}"))
        .json(&json!({ "status": "Completed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let patched: Value = resp.json().await.unwrap();
    assert_eq!(patched["status"], "Completed");
    assert_eq!(patched["createdAt"], created["createdAt"]);

    // Another user sees nothing and cannot fetch it.
    let (_, body) = get(&base, "/api/v1/users/bob/projects").await;
    assert_eq!(body["projects"].as_array().unwrap().len(), 0);
    let (status, _) = get(&base, &format!("/api/v1/users/bob/projects/{id}")).await;
    assert_eq!(status, 404);

    // Delete, then the project is gone.
    let resp = reqwest::Client::new()
        .delete(format!("{base}/api/v1/users/alice/projects/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let (status, body) = get(&base, &format!("/api/v1/users/alice/projects/{id}")).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn test_update_missing_project_is_404() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let resp = reqwest::Client::new()
        .patch(format!("{base}/api/v1/users/alice/projects/proj_0_nope"))
        .json(&json!({ "name": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn test_active_project_pointer() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (_, created) = post(
        &base,
        "/api/v1/users/alice/projects",
        json!({ "name": "Active" }),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (_, body) = get(&base, "/api/v1/users/alice/active-project").await;
    assert!(body["projectId"].is_null());

    let resp = reqwest::Client::new()
        .put(format!("{base}/api/v1/users/alice/active-project"))
        .json(&json!({ "projectId": id }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let (_, body) = get(&base, "/api/v1/users/alice/active-project").await;
    assert_eq!(body["projectId"], id.as_str());

    // Deleting the project clears the pointer.
    reqwest::Client::new()
        .delete(format!("{base}/api/v1/users/alice/projects/{id}"))
        .send()
        .await
        .unwrap();
    let (_, body) = get(&base, "/api/v1/users/alice/active-project").await;
    assert!(body["projectId"].is_null());
}

// ─── History endpoints ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_history_push_and_cap() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let (status, body) = post(&base, "/api/v1/history", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "No code provided");

    for i in 0..6 {
        let (status, _) = post(&base, "/api/v1/history", json!({ "code": format!("s{i}") })).await;
        assert_eq!(status, 200);
    }

    let (status, body) = get(&base, "/api/v1/history").await;
    assert_eq!(status, 200);
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history[0], "s5");
    assert_eq!(history[4], "s1");
}
