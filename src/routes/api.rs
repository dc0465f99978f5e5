//! routes/api.rs
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Extension},
    http::{header::HOST, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::{ingest::ingest, state::AppState};

pub const BODY_LIMIT: usize = 100 * 1024 * 1024;

pub fn router() -> Router {
    Router::new()
        .route("/api", post(push))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
}

/* ---------------- Push ---------------- */
/// Acknowledges at once; the batch is handled on its own task.
async fn push(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let host = headers.get(HOST).and_then(|h| h.to_str().ok()).map(str::to_owned);
    tokio::spawn(async move {
        ingest(&state, host.as_deref(), &body).await;
    });
    StatusCode::CREATED                  // ★ 201, whatever happens next
}
