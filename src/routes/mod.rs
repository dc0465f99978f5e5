use axum::Router;

pub mod api;
pub mod client;
pub mod ws;

pub fn router() -> Router {
    Router::new()
        .merge(api::router())
        .merge(client::router())
        .merge(ws::router())
}
