use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::AppResult;

/// One tweet as the feed carries it. Never interpreted, only stored and forwarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub content:   String,
    #[serde(alias = "date")]
    pub timestamp: String,
    pub id:        String,
    #[serde(default)]
    pub entities:  Map<String, Value>,
    pub user:      User,
    /// Keys the feed sent that we don't model; forwarded as they came.
    #[serde(flatten)]
    pub extra:     Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub handle:     String,
    pub full_name:  String,
    pub avatar_url: String,
}

/// A batch as it travels through history and broadcast.
pub type Batch = Vec<Arc<Record>>;

/// Decodes a raw request body into a batch (a JSON array of records).
pub fn decode_batch(raw: &[u8]) -> AppResult<Batch> {
    let records: Vec<Record> = serde_json::from_slice(raw)?;
    Ok(records.into_iter().map(Arc::new).collect())
}

#[cfg(test)]
pub(crate) fn sample(id: &str) -> Arc<Record> {
    Arc::new(Record {
        content:   format!("tweet {id}"),
        timestamp: "2016-03-01T12:00:00".into(),
        id:        id.into(),
        entities:  Map::new(),
        user: User {
            handle:     "rustlang".into(),
            full_name:  "Rust Language".into(),
            avatar_url: "http://example.com/a.png".into(),
        },
        extra:     Map::new(),
    })
}
