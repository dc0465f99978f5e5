//! What happens to a pushed batch after the caller got its 201.

use tracing::{error, info, warn};

use crate::{record::decode_batch, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingested {
    /// Stored and fanned out; carries the batch size.
    Applied(usize),
    OriginRejected,
    Malformed,
}

/// Origin check, decode, history insert, then broadcast. Never fails
/// towards the caller; every outcome is only logged.
pub async fn ingest(state: &AppState, host: Option<&str>, raw: &[u8]) -> Ingested {
    if !state.gate.admits(host) {
        warn!(?host, "ingestion from foreign host discarded");
        return Ingested::OriginRejected;
    }

    let batch = match decode_batch(raw) {
        Ok(b)  => b,
        Err(e) => { error!("malformed data received: {e}"); return Ingested::Malformed; }
    };
    if batch.is_empty() { return Ingested::Applied(0); }

    // history first, so a fresh snapshot never lags behind a live frame
    state.history.write().await.insert_batch(&batch);
    let report = state.registry.broadcast(&batch).await;
    info!(records = batch.len(), delivered = report.delivered, evicted = report.evicted, "batch ingested");
    Ingested::Applied(batch.len())
}
