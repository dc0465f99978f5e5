//! Re-broadcasts pushed tweet batches to every connected WebSocket
//! subscriber, keeping a short history for late joiners.

pub mod config;
pub mod error;
pub mod feeder;
pub mod history;
pub mod ingest;
pub mod record;
pub mod registry;
pub mod routes;
pub mod state;

use axum::{Extension, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{config::Config, state::AppState};

/// Full router: `/api`, `/websocket`, and static files for everything else.
pub fn app(cfg: &Config, state: AppState) -> Router {
    let app = routes::router()
        .fallback_service(ServeDir::new(&cfg.static_dir))
        .layer(Extension(state));
    if cfg.debug { app.layer(TraceLayer::new_for_http()) } else { app }
}
