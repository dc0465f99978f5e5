use tracing::info;
use tweefeed::{config::Config, error::AppErr, state::AppState};

#[tokio::main]
async fn main() -> Result<(), AppErr> {
    let cfg = Config::load()?;
    tracing_subscriber::fmt().with_max_level(cfg.effective_level()).init();

    let state = AppState::from_config(&cfg);
    let app   = tweefeed::app(&cfg, state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
