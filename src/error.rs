use std::fmt::Display;

pub type AppResult<T> = Result<T, AppErr>;

#[derive(thiserror::Error, Debug)]
pub enum AppErr {
    #[error("Config: {0}")]
    Config(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Upstream: {0}")]
    Upstream(#[from] reqwest::Error),
}

/* ── helper: any Display error → Config ── */
pub fn config<E: Display>(e: E) -> AppErr { AppErr::Config(e.to_string()) }
