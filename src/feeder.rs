use reqwest::Client;
use tracing::info;

use crate::{error::AppResult, record::Record};

pub const DEFAULT_CONSUMER_URL: &str = "http://localhost:8888/api";

/// Pushes batches into a running server's ingestion endpoint, the way an
/// upstream feed client would.
#[derive(Clone)]
pub struct Feeder {
    client: Client,
    url:    String,
}

impl Feeder {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: Client::new(), url: url.into() }
    }

    pub fn url(&self) -> &str { &self.url }

    /// Failures are returned, not logged; the caller reports them.
    pub async fn send<R: AsRef<Record>>(&self, batch: &[R]) -> AppResult<()> {
        let records: Vec<&Record> = batch.iter().map(AsRef::as_ref).collect();
        let res = self.client
            .post(&self.url)
            .json(&records)
            .send()
            .await
            .and_then(|r| r.error_for_status());
        let r = res?;
        info!(status = %r.status(), records = records.len(), "batch pushed");
        Ok(())
    }
}
