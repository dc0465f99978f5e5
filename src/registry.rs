//! Live subscriber sessions and the fan-out over them.

use std::{collections::HashMap, fmt, sync::Arc};

use axum::extract::ws::{Message, Utf8Bytes};
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error};
use uuid::Uuid;

use crate::record::Record;

pub type Outbound = mpsc::Sender<Message>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for SessionId {
    fn default() -> Self { Self::new() }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// Outcome of one `broadcast` call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub attempted: usize,
    pub delivered: usize,
    pub evicted:   usize,
}

/// Cheap to clone; every clone points at the same set.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<RwLock<HashMap<SessionId, Outbound>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self { Self::default() }

    /// Returns the number of live sessions afterwards.
    pub async fn add(&self, id: SessionId, tx: Outbound) -> usize {
        let mut m = self.inner.write().await;
        m.insert(id, tx);
        m.len()
    }

    /// Idempotent. `true` only when the session was still registered.
    pub async fn remove(&self, id: SessionId) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize { self.inner.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.inner.read().await.is_empty() }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.inner.read().await.contains_key(&id)
    }

    /// Serializes `batch` once and offers the frame to every session
    /// registered at call time. A session whose queue is closed or full is
    /// evicted; the rest still get the frame.
    pub async fn broadcast(&self, batch: &[Arc<Record>]) -> Delivery {
        let payload = match serde_json::to_string(batch) {
            Ok(s)  => Utf8Bytes::from(s),
            Err(e) => { error!("cannot encode batch: {e}"); return Delivery::default(); }
        };

        // copy the members so eviction never touches the set we walk
        let members: Vec<(SessionId, Outbound)> = self.inner.read().await
            .iter().map(|(id, tx)| (*id, tx.clone())).collect();

        let mut report = Delivery { attempted: members.len(), ..Delivery::default() };
        for (id, tx) in members {
            match tx.try_send(Message::Text(payload.clone())) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    error!(session = %id, "error sending message: {e}");
                    if self.remove(id).await { report.evicted += 1; }
                }
            }
            tokio::task::yield_now().await;
        }
        debug!(?report, "broadcast done");
        report
    }
}
