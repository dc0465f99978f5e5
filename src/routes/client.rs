use axum::{extract::Extension, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// What the browser page needs to know about this server.
#[derive(Serialize)]
pub struct ClientSettings {
    pub history_size:   usize,
    pub websocket_path: &'static str,
}

pub fn router() -> Router {
    Router::new().route("/client.json", get(settings))
}

async fn settings(Extension(state): Extension<AppState>) -> Json<ClientSettings> {
    let history_size = state.history.read().await.capacity();
    Json(ClientSettings { history_size, websocket_path: super::ws::PATH })
}
