#![allow(dead_code)]

use std::time::Duration;

use axum_test::{TestServer, TestWebSocket};
use serde_json::{json, Value};
use tweefeed::{config::Config, state::AppState};

pub struct TestApp {
    pub server: TestServer,
    pub state:  AppState,
}

/// Real HTTP transport, needed for WebSocket upgrades.
pub fn spawn_app(cfg: Config) -> TestApp {
    let state = AppState::from_config(&cfg);
    let server = TestServer::builder()
        .http_transport()
        .build(tweefeed::app(&cfg, state.clone()))
        .expect("Failed to create test server");
    TestApp { server, state }
}

pub fn config(history_size: usize, allowed_host: &str) -> Config {
    Config { history_size, allowed_host: allowed_host.into(), ..Config::default() }
}

pub fn tweet(id: &str) -> Value {
    json!({
        "content": format!("tweet {id} #rust"),
        "timestamp": "2016-03-01T12:00:00",
        "id": id,
        "entities": {"hashtags": [{"text": "rust"}]},
        "user": {"handle": "ferris", "full_name": "Ferris", "avatar_url": "http://example.com/f.png"}
    })
}

pub fn ids(batch: &[Value]) -> Vec<String> {
    batch.iter().map(|r| r["id"].as_str().unwrap_or_default().to_owned()).collect()
}

pub async fn subscribe(app: &TestApp) -> TestWebSocket {
    app.server.get_websocket("/websocket").await.into_websocket().await
}

pub async fn receive_batch(ws: &mut TestWebSocket) -> Vec<Value> {
    ws.receive_json::<Vec<Value>>().await
}

/// Ingestion runs after the 201, so tests poll for its effect.
pub async fn wait_for_history(state: &AppState, len: usize) {
    for _ in 0..200 {
        if history_len(state).await == len { return; }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("history never reached {len} records");
}

pub async fn wait_for_sessions(state: &AppState, live: usize) {
    for _ in 0..200 {
        if state.registry.len().await == live { return; }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("registry never reached {live} sessions");
}

pub async fn history_len(state: &AppState) -> usize {
    state.history.read().await.len()
}
