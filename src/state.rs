use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{config::Config, history::HistoryBuffer, registry::ConnectionRegistry};

/* ------------ 最近推文 ------------ */
pub type SharedHistory = Arc<RwLock<HistoryBuffer>>;

pub fn shared_history(capacity: usize) -> SharedHistory {
    Arc::new(RwLock::new(HistoryBuffer::new(capacity)))
}

/* ------------ 匯入閘門 ------------ */
/// Coarse prefix filter on the declared `Host`. Trivially spoofable; it only
/// keeps casual callers out of the ingestion endpoint.
#[derive(Clone, Debug)]
pub struct IngestGate {
    pub allowed_host: Arc<str>,
}

impl IngestGate {
    pub fn new(allowed_host: impl Into<Arc<str>>) -> Self {
        Self { allowed_host: allowed_host.into() }
    }

    pub fn admits(&self, host: Option<&str>) -> bool {
        host.is_some_and(|h| h.starts_with(&*self.allowed_host))
    }
}

/* ------------ 每個 session 的設定 ------------ */
#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    /// Outbound frames queued per subscriber before it counts as failed.
    pub send_buffer: usize,
}

/// Everything the routes share, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub history:  SharedHistory,
    pub registry: ConnectionRegistry,
    pub gate:     IngestGate,
    pub session:  SessionConfig,
}

impl AppState {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            history:  shared_history(cfg.history_size),
            registry: ConnectionRegistry::new(),
            gate:     IngestGate::new(cfg.allowed_host.as_str()),
            session:  SessionConfig { send_buffer: cfg.send_buffer },
        }
    }
}
