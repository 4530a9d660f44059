//! Integration tests for the HTTP client against a local fake API.
//!
//! The fake is a plain axum router bound to an ephemeral port; each test
//! spins up its own instance.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    routing::{get, post},
};
use memory_browser_sdk::{Client, Error, EventQuery, RecordQuery, RetrieveRequest};
use serde_json::{Value, json};

// =============================================================================
// Test Utilities
// =============================================================================

/// Everything the fake API saw, for assertions.
#[derive(Debug, Default, Clone)]
struct Seen {
    raw_queries: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    memory_ids: Arc<Mutex<Vec<String>>>,
}

async fn list_memories() -> Json<Value> {
    Json(json!([
        {"id": "mem-1", "arn": "arn:mem-1", "status": "ACTIVE", "name": "support",
         "createdAt": 1_700_000_000, "updatedAt": "2025-01-02T03:04:05Z"},
        {"id": "mem-2", "arn": "arn:mem-2", "status": "creating",
         "createdAt": 1_700_000_000, "updatedAt": 1_700_000_100}
    ]))
}

async fn get_memory(State(seen): State<Seen>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    seen.memory_ids.lock().unwrap().push(id.clone());
    if id == "missing" {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "id": id,
        "arn": "arn:x",
        "name": "support",
        "status": "ACTIVE",
        "strategies": [{
            "strategyId": "s-1",
            "name": "prefs",
            "type": "USER_PREFERENCE",
            "status": "ACTIVE",
            "namespaces": ["/{memoryStrategyId}/prefs/"]
        }]
    })))
}

async fn list_events(
    State(seen): State<Seen>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    seen.raw_queries.lock().unwrap().push(raw.unwrap_or_default());
    Json(json!({
        "events": [{
            "eventId": "ev-1",
            "sessionId": params.get("session_id"),
            "actorId": params.get("actor_id"),
            "createdAt": 1_700_000_000
        }],
        "nextToken": null
    }))
}

async fn list_records(State(seen): State<Seen>, RawQuery(raw): RawQuery) -> Json<Value> {
    seen.raw_queries.lock().unwrap().push(raw.unwrap_or_default());
    Json(json!({
        "records": [{"memoryRecordId": "rec-1", "memoryStrategyId": "s-1",
                     "content": {"text": "likes tea"}}],
        "nextToken": "page-2"
    }))
}

async fn retrieve(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    seen.bodies.lock().unwrap().push(body);
    Json(json!({"records": []}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "{\"detail\": \"boom\"}")
}

/// Start the fake API and return a client pointed at it.
async fn spawn_fake_api() -> (Client, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/api/memories", get(list_memories))
        .route("/api/memories/{id}", get(get_memory))
        .route("/api/memories/{id}/events", get(list_events))
        .route("/api/memories/{id}/records", get(list_records))
        .route("/api/memories/{id}/retrieve", post(retrieve))
        .route("/broken/api/memories", get(broken))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = Client::new(format!("http://{addr}")).unwrap();
    (client, seen)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_list_memories() {
    let (client, _) = spawn_fake_api().await;
    let memories = client.memories().list().await.unwrap();
    assert_eq!(memories.len(), 2);
    assert_eq!(memories[0].name.as_deref(), Some("support"));
    assert_eq!(memories[1].name, None);
}

#[tokio::test]
async fn test_get_memory_with_strategies() {
    let (client, _) = spawn_fake_api().await;
    let memory = client.memories().get("mem-1").await.unwrap();
    assert_eq!(memory.strategies.len(), 1);
    assert_eq!(memory.strategies[0].kind, "USER_PREFERENCE");
}

#[tokio::test]
async fn test_memory_id_is_path_encoded() {
    let (client, seen) = spawn_fake_api().await;
    client.memories().get("mem 1").await.unwrap();
    assert_eq!(seen.memory_ids.lock().unwrap().as_slice(), ["mem 1"]);
}

#[tokio::test]
async fn test_non_success_status_is_uniform_failure() {
    let (client, _) = spawn_fake_api().await;
    let err = client.memories().get("missing").await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "HTTP 404: Not Found");
}

#[tokio::test]
async fn test_error_body_is_not_parsed() {
    let (client, _) = spawn_fake_api().await;
    let base = format!("{}broken/", client.base_url());
    let broken = Client::new(base).unwrap();
    let err = broken.memories().list().await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn test_event_query_is_percent_encoded() {
    let (client, seen) = spawn_fake_api().await;
    let page = client
        .memories()
        .list_events(
            "mem-1",
            &EventQuery {
                session_id: "session a&b".to_string(),
                actor_id: "user/42".to_string(),
                max_results: 50,
                next_token: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.events[0].session_id.as_deref(), Some("session a&b"));
    assert_eq!(page.events[0].actor_id.as_deref(), Some("user/42"));

    let raw = seen.raw_queries.lock().unwrap()[0].clone();
    assert!(raw.contains("max_results=50"));
    assert!(!raw.contains("a&b"));
    assert!(raw.contains("user%2F42"));
}

#[tokio::test]
async fn test_record_query_and_next_token() {
    let (client, seen) = spawn_fake_api().await;
    let page = client
        .memories()
        .list_records(
            "mem-1",
            &RecordQuery {
                namespace: "/s-1/prefs/".to_string(),
                memory_strategy_id: None,
                max_results: 50,
                next_token: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.records[0].id(), Some("rec-1"));
    assert_eq!(page.next_token.as_deref(), Some("page-2"));
    let raw = seen.raw_queries.lock().unwrap()[0].clone();
    assert!(raw.starts_with("namespace=%2Fs-1%2Fprefs%2F"));
    assert!(!raw.contains("memory_strategy_id"));
}

#[tokio::test]
async fn test_retrieve_posts_camel_case_body() {
    let (client, seen) = spawn_fake_api().await;
    let page = client
        .memories()
        .retrieve(
            "mem-1",
            &RetrieveRequest {
                query: "tea or coffee".to_string(),
                namespace: "/s-1/prefs/".to_string(),
                max_results: 20,
                next_token: None,
            },
        )
        .await
        .unwrap();

    assert!(page.records.is_empty());
    let body = seen.bodies.lock().unwrap()[0].clone();
    assert_eq!(
        body,
        json!({"query": "tea or coffee", "namespace": "/s-1/prefs/", "maxResults": 20})
    );
}
