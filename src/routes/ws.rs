use axum::{
    extract::{ws::{Message, WebSocket, WebSocketUpgrade}, Extension},
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    record::Batch,
    registry::{ConnectionRegistry, SessionId},
    state::AppState,
};

pub const PATH: &str = "/websocket";

pub fn router() -> Router {
    Router::new().route(PATH, get(ws_handler))
}

/// Any origin may subscribe.
async fn ws_handler(ws: WebSocketUpgrade, Extension(state): Extension<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |sock| async move { Session::open(&state, sock).await.run().await })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState { Open, Closed }

/* ---------------- per subscriber ---------------- */
pub struct Session {
    id:       SessionId,
    state:    SessionState,
    registry: ConnectionRegistry,
    writer:   tokio::task::JoinHandle<()>,
    reader:   tokio::task::JoinHandle<()>,
}

impl Session {
    /// Registers first, then reads the snapshot: a batch racing with the
    /// attach may show up twice but never goes missing.
    pub async fn open(app: &AppState, sock: WebSocket) -> Self {
        let id = SessionId::new();
        let (tx, rx) = mpsc::channel(app.session.send_buffer);
        let live = app.registry.add(id, tx).await;
        info!(session = %id, "connection opened, waiters: {live}");

        let snapshot = app.history.read().await.snapshot();
        let (sink, stream) = sock.split();
        Self {
            id,
            state:    SessionState::Open,
            registry: app.registry.clone(),
            writer:   tokio::spawn(write_loop(id, sink, snapshot, rx)),
            reader:   tokio::spawn(read_loop(id, stream)),
        }
    }

    /// Lives until either half ends, then closes.
    pub async fn run(mut self) {
        tokio::select! {
            r = &mut self.writer => if let Err(e) = r { error!(session = %self.id, "writer failed: {e}") },
            r = &mut self.reader => if let Err(e) = r { error!(session = %self.id, "reader failed: {e}") },
        }
        self.close().await;
    }

    /// Safe to call more than once, and while a broadcast is walking the registry.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed { return; }
        self.state = SessionState::Closed;
        self.writer.abort();
        self.reader.abort();
        self.registry.remove(self.id).await;
        info!(session = %self.id, "connection closed");
    }
}

/// Snapshot first, then whatever the dispatcher queues.
async fn write_loop(
    id: SessionId,
    mut sink: SplitSink<WebSocket, Message>,
    snapshot: Batch,
    mut rx: mpsc::Receiver<Message>,
) {
    let first = match serde_json::to_string(&snapshot) {
        Ok(s)  => s,
        Err(e) => { error!(session = %id, "cannot encode history: {e}"); return; }
    };
    if sink.send(Message::Text(first.into())).await.is_err() { return; }

    while let Some(msg) = rx.recv().await {
        if let Err(e) = sink.send(msg).await {
            debug!(session = %id, "peer gone: {e}");
            break;
        }
    }
    let _ = sink.close().await;
}

/// Subscribers have nothing to say; drain until they hang up.
async fn read_loop(id: SessionId, mut stream: SplitStream<WebSocket>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_)  => {}
            Err(e) => { debug!(session = %id, "read error: {e}"); break; }
        }
    }
}
