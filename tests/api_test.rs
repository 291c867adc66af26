//! End-to-end HTTP tests. Spins up the REST server on a random port and
//! drives it with a real HTTP client.

use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use vibeboard::{config::BoardConfig, rest, storage::Storage, AppContext};

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Start the server on a random port and return its base URL.
async fn spawn_server(dir: &TempDir) -> String {
    let port = find_free_port();
    let config = BoardConfig::new(
        Some(port),
        None,
        Some(dir.path().to_path_buf()),
        Some("error".to_string()),
    );
    let storage = Storage::new(&config.data_dir).await.unwrap();
    let ctx = Arc::new(AppContext {
        config: Arc::new(config),
        storage: Arc::new(storage),
        started_at: std::time::Instant::now(),
    });

    tokio::spawn(async move {
        let _ = rest::start_rest_server(ctx).await;
    });

    // Give the server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_task_lifecycle_end_to_end() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{base}/api/tasks"))
        .json(&json!({ "content": "buy milk", "category": "todo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let task: Value = res.json().await.unwrap();
    let id = task["id"].as_i64().expect("id should be an integer");
    assert_eq!(task["content"], "buy milk");
    assert_eq!(task["category"], "todo");
    assert!(task["created_at"].is_string());

    // Partial update: category changes, content is preserved.
    let res = client
        .put(format!("{base}/api/tasks/{id}"))
        .json(&json!({ "category": "done" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let task: Value = res.json().await.unwrap();
    assert_eq!(task["category"], "done");
    assert_eq!(task["content"], "buy milk");

    // Delete, then the list no longer contains it.
    let res = client
        .delete(format!("{base}/api/tasks/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    let tasks: Vec<Value> = client
        .get(format!("{base}/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(tasks.iter().all(|t| t["id"].as_i64() != Some(id)));
}

#[tokio::test]
async fn test_list_orders_most_recent_first() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    for content in ["first", "second", "third"] {
        let res = client
            .post(format!("{base}/api/tasks"))
            .json(&json!({ "content": content, "category": "quick-list" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
    }

    let tasks: Vec<Value> = client
        .get(format!("{base}/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let contents: Vec<&str> = tasks.iter().map(|t| t["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_create_rejects_invalid_category_and_persists_nothing() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/tasks"))
        .json(&json!({ "content": "x", "category": "invalid" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);

    let tasks: Vec<Value> = client
        .get(format!("{base}/api/tasks"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(tasks.is_empty(), "no row should be persisted");
}

#[tokio::test]
async fn test_create_rejects_empty_content() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/tasks"))
        .json(&json!({ "content": "", "category": "todo" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
}

#[tokio::test]
async fn test_update_with_no_fields_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/api/tasks"))
        .json(&json!({ "content": "a", "category": "todo" }))
        .send()
        .await
        .unwrap();
    let task: Value = res.json().await.unwrap();
    let id = task["id"].as_i64().unwrap();

    let res = client
        .put(format!("{base}/api/tasks/{id}"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "No fields to update");
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .put(format!("{base}/api/tasks/9999"))
        .json(&json!({ "content": "x", "category": "done" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_delete_unknown_id_succeeds() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    let res = client
        .delete(format!("{base}/api/tasks/9999"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);
}

#[tokio::test]
async fn test_note_get_and_replace() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    // Freshly initialized: one note, empty content.
    let note: Value = client
        .get(format!("{base}/api/note"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(note["id"].is_i64());
    assert_eq!(note["content"], "");

    let res = client
        .put(format!("{base}/api/note"))
        .json(&json!({ "content": "scratch" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let note: Value = res.json().await.unwrap();
    assert_eq!(note["content"], "scratch");

    let note: Value = client
        .get(format!("{base}/api/note"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(note["content"], "scratch");
}

#[tokio::test]
async fn test_note_rejects_malformed_body() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;
    let client = reqwest::Client::new();

    // Missing the required `content` field.
    let res = client
        .put(format!("{base}/api/note"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let base = spawn_server(&dir).await;

    let res = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"].as_str().unwrap(), env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].is_number());
}
