mod common;

use std::{collections::HashSet, time::Duration};

use axum::{body::Bytes, http::StatusCode};
use serde_json::json;

use common::{
    config, history_len, ids, receive_batch, spawn_app, subscribe, tweet, wait_for_history,
    wait_for_sessions,
};

#[tokio::test]
async fn push_is_acknowledged_even_when_malformed() {
    let app = spawn_app(config(5, "localhost"));

    app.server
        .post("/api")
        .add_header("Host", "localhost:8888")
        .bytes(Bytes::from_static(b"this is not json"))
        .await
        .assert_status(StatusCode::CREATED);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(history_len(&app.state).await, 0);
}

#[tokio::test]
async fn new_subscriber_receives_snapshot() {
    let app = spawn_app(config(5, "localhost"));

    app.server
        .post("/api")
        .add_header("Host", "localhost:8888")
        .json(&json!([tweet("X"), tweet("Y"), tweet("Z")]))
        .await
        .assert_status(StatusCode::CREATED);
    wait_for_history(&app.state, 3).await;

    let mut ws = subscribe(&app).await;
    let snapshot = receive_batch(&mut ws).await;
    assert_eq!(ids(&snapshot), ["X", "Y", "Z"]);
    assert_eq!(snapshot[0]["entities"]["hashtags"][0]["text"], "rust");
    ws.close().await;
}

#[tokio::test]
async fn live_batch_reaches_every_subscriber() {
    let app = spawn_app(config(5, "localhost"));
    let mut first  = subscribe(&app).await;
    let mut second = subscribe(&app).await;
    assert!(receive_batch(&mut first).await.is_empty());
    assert!(receive_batch(&mut second).await.is_empty());

    app.server
        .post("/api")
        .add_header("Host", "localhost")
        .json(&json!([tweet("A"), tweet("B")]))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(ids(&receive_batch(&mut first).await), ["A", "B"]);
    assert_eq!(ids(&receive_batch(&mut second).await), ["A", "B"]);
    assert_eq!(history_len(&app.state).await, 2);
}

#[tokio::test]
async fn foreign_host_is_acknowledged_but_ignored() {
    let app = spawn_app(config(5, "localhost"));
    let mut ws = subscribe(&app).await;
    assert!(receive_batch(&mut ws).await.is_empty());

    app.server
        .post("/api")
        .add_header("Host", "evil.example.com")
        .json(&json!([tweet("spoof")]))
        .await
        .assert_status(StatusCode::CREATED);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(history_len(&app.state).await, 0);

    app.server
        .post("/api")
        .add_header("Host", "localhost")
        .json(&json!([tweet("real")]))
        .await
        .assert_status(StatusCode::CREATED);

    // the rejected batch never produced a frame
    assert_eq!(ids(&receive_batch(&mut ws).await), ["real"]);
}

#[tokio::test]
async fn history_window_evicts_oldest() {
    let app = spawn_app(config(2, "localhost"));

    app.server.post("/api").add_header("Host", "localhost").json(&json!([tweet("A")])).await;
    wait_for_history(&app.state, 1).await;
    app.server
        .post("/api")
        .add_header("Host", "localhost")
        .json(&json!([tweet("B"), tweet("C")]))
        .await;
    wait_for_history(&app.state, 2).await;

    let mut ws = subscribe(&app).await;
    assert_eq!(ids(&receive_batch(&mut ws).await), ["B", "C"]);
}

#[tokio::test]
async fn closed_subscriber_leaves_registry() {
    let app = spawn_app(config(5, "localhost"));
    let mut ws = subscribe(&app).await;
    receive_batch(&mut ws).await;
    assert_eq!(app.state.registry.len().await, 1);

    ws.close().await;
    wait_for_sessions(&app.state, 0).await;
}

#[tokio::test]
async fn oversize_push_is_still_acknowledged() {
    let app = spawn_app(config(5, "localhost"));

    app.server
        .post("/api")
        .add_header("Host", "localhost")
        .bytes(Bytes::from(vec![b'x'; 2 * 1024 * 1024]))
        .await
        .assert_status(StatusCode::CREATED);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(history_len(&app.state).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn subscribers_attaching_mid_stream_miss_nothing() {
    const BATCHES: usize = 40;
    const SUBSCRIBERS: usize = 8;
    // history holds every batch, so whatever precedes a snapshot is in it
    let app = spawn_app(config(BATCHES, "localhost"));

    let pushing = async {
        for i in 0..BATCHES {
            app.server
                .post("/api")
                .add_header("Host", "localhost")
                .json(&json!([tweet(&format!("b{i}"))]))
                .await
                .assert_status(StatusCode::CREATED);
            tokio::task::yield_now().await;
        }
    };
    let attaching = async {
        let mut subs = Vec::with_capacity(SUBSCRIBERS);
        for _ in 0..SUBSCRIBERS {
            let mut ws = subscribe(&app).await;
            let seen: HashSet<String> = ids(&receive_batch(&mut ws).await).into_iter().collect();
            subs.push((ws, seen));
            tokio::task::yield_now().await;
        }
        subs
    };
    let ((), mut subs) = tokio::join!(pushing, attaching);
    wait_for_history(&app.state, BATCHES).await;

    let all: HashSet<String> = (0..BATCHES).map(|i| format!("b{i}")).collect();
    for (n, (ws, seen)) in subs.iter_mut().enumerate() {
        while !all.is_subset(seen) {
            let frame = tokio::time::timeout(Duration::from_secs(5), receive_batch(ws))
                .await
                .unwrap_or_else(|_| panic!("subscriber {n} is missing {:?}", all.difference(seen).collect::<Vec<_>>()));
            seen.extend(ids(&frame));
        }
    }
    assert_eq!(app.state.registry.len().await, SUBSCRIBERS);
}

#[tokio::test]
async fn client_settings_follow_history_size() {
    let app = spawn_app(config(7, "localhost"));

    let res = app.server.get("/client.json").await;
    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["history_size"], 7);
    assert_eq!(body["websocket_path"], "/websocket");
}
