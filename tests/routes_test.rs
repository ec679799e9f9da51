// ABOUTME: HTTP integration tests for the chat, entry, proxy, and health routes
// ABOUTME: Sends requests through the assembled router with oneshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nutrilog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use helpers::scripted::{Scripted, ScriptedProvider, StaticLookup};
use nutrilog::routes::{router, HealthRoutes, ServerResources};
use serde_json::{json, Value};

const EGGS_JSON: &str = r#"{"name":"2 boiled eggs","amount":"2 large","calories":156,"protein":12.6,"carbs":1.1,"fat":10.6,"sugar":1.1}"#;

async fn resources(provider: ScriptedProvider) -> Arc<ServerResources> {
    let lookup = StaticLookup::new().with("2 boiled eggs", &["Title: Egg\nSnippet: 78 kcal each"]);
    common::create_test_resources(Arc::new(provider), Arc::new(lookup))
        .await
        .unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    for path in ["/", "/health"] {
        let response = AxumTestRequest::get(path).send(HealthRoutes::routes()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
    }
}

// ============================================================================
// POST /api/chat/message
// ============================================================================

#[tokio::test]
async fn test_chat_message_returns_draft_and_logs_exchange() {
    let provider = ScriptedProvider::new()
        .classify(Scripted::reply(r#"{"action":"SEARCH","items":["2 boiled eggs"]}"#))
        .extract("2 boiled eggs", Scripted::reply(EGGS_JSON));
    let resources = resources(provider).await;

    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "messages": [{ "role": "user", "content": "I had 2 boiled eggs" }] }))
        .send(router(resources.clone()))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["draft_entry"]["name"], "2 boiled eggs");
    assert_eq!(body["draft_entry"]["total_calories"], 156);
    assert_eq!(body["draft_entry"]["total_protein"], 12.6);

    let logs = resources.database.chat_logs().recent(5).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].user_message.as_deref(), Some("I had 2 boiled eggs"));
    assert_eq!(logs[0].bot_response.as_deref(), body["text"].as_str());
}

#[tokio::test]
async fn test_chat_message_clarify_has_null_draft() {
    let provider = ScriptedProvider::new().classify(Scripted::reply(
        r#"{"action":"CLARIFY","question":"How were they cooked?"}"#,
    ));
    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "messages": [{ "role": "user", "content": "I had eggs" }] }))
        .send(router(resources(provider).await))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["text"], "How were they cooked?");
    assert!(body["draft_entry"].is_null());
}

#[tokio::test]
async fn test_chat_message_rejects_empty_history() {
    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "messages": [] }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "InvalidInput");
}

#[tokio::test]
async fn test_chat_message_assistant_last_is_not_logged_as_user() {
    let provider = ScriptedProvider::new()
        .classify(Scripted::reply(r#"{"action":"CHITCHAT","reply":"Anything else?"}"#));
    let resources = resources(provider).await;

    AxumTestRequest::post("/api/chat/message")
        .json(&json!({ "messages": [
            { "role": "user", "content": "hi" },
            { "role": "assistant", "content": "Hello!" }
        ] }))
        .send(router(resources.clone()))
        .await;

    let logs = resources.database.chat_logs().recent(5).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].user_message.is_none());
    assert_eq!(logs[0].bot_response.as_deref(), Some("Anything else?"));
}

#[tokio::test]
async fn test_chat_message_provider_override_uses_local_stub() {
    // The scripted provider would fail this turn; the override must bypass it
    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({
            "messages": [{ "role": "user", "content": "I had eggs" }],
            "provider": "local"
        }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["text"].as_str().unwrap().contains("dummy local model"));
}

#[tokio::test]
async fn test_chat_message_unconfigured_provider_falls_back_to_local() {
    let response = AxumTestRequest::post("/api/chat/message")
        .json(&json!({
            "messages": [{ "role": "user", "content": "I had eggs" }],
            "provider": "openai"
        }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["text"].as_str().unwrap().contains("dummy local model"));
}

// ============================================================================
// /api/entries
// ============================================================================

#[tokio::test]
async fn test_create_and_list_entries() {
    let resources = resources(ScriptedProvider::new()).await;

    let created = AxumTestRequest::post("/api/entries")
        .json(&json!({
            "name": "Breakfast",
            "calories": 235,
            "protein": 15.3,
            "carbs": 15.4,
            "fat": 11.6,
            "sugar": 2.5,
            "details": "2 boiled eggs, 1 slice of toast"
        }))
        .send(router(resources.clone()))
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = created.json();
    assert_eq!(body["calories"], 235);
    assert!(body["id"].as_i64().unwrap() > 0);

    AxumTestRequest::post("/api/entries")
        .json(&json!({ "name": "Snack", "protein": 10, "carbs": 20, "fat": 5 }))
        .send(router(resources.clone()))
        .await;

    let listed = AxumTestRequest::get("/api/entries")
        .send(router(resources))
        .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let entries: Vec<Value> = listed.json();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "Snack");
    assert_eq!(entries[0]["calories"], 165);
    assert_eq!(entries[1]["details"], "2 boiled eggs, 1 slice of toast");
}

#[tokio::test]
async fn test_create_entry_blank_name_is_bad_request() {
    let response = AxumTestRequest::post("/api/entries")
        .json(&json!({ "name": " " }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// POST /api/llm/chat
// ============================================================================

#[tokio::test]
async fn test_llm_proxy_with_local_provider() {
    let response = AxumTestRequest::post("/api/llm/chat?provider=local")
        .json(&json!({ "messages": [{ "role": "user", "content": "ping" }] }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json();
    let reply: Value = serde_json::from_str(body["reply"].as_str().unwrap()).unwrap();
    assert_eq!(reply["action"], "CHITCHAT");
}

#[tokio::test]
async fn test_llm_proxy_missing_credentials_is_error() {
    let response = AxumTestRequest::post("/api/llm/chat?provider=anthropic")
        .json(&json!({ "messages": [{ "role": "user", "content": "ping" }] }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "ConfigMissing");
}

#[tokio::test]
async fn test_llm_proxy_upstream_failure_is_bad_gateway() {
    // Unscripted requests fail as a generic upstream error
    let response = AxumTestRequest::post("/api/llm/chat")
        .json(&json!({ "messages": [{ "role": "user", "content": "ping" }] }))
        .send(router(resources(ScriptedProvider::new()).await))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
