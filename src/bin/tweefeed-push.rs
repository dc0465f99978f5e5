//! Pushes a JSON array of records (file argument or stdin) to a running
//! server. `TWEEFEED_CONSUMER_URL` overrides the target.

use std::io::Read;

use anyhow::Context;
use tweefeed::{
    config::log_level,
    feeder::{Feeder, DEFAULT_CONSUMER_URL},
    record::decode_batch,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let level = log_level(|k| std::env::var(k).ok())?;
    tracing_subscriber::fmt().with_max_level(level).init();

    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read(&path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let batch = decode_batch(&raw).context("input is not a JSON array of records")?;

    let url = std::env::var("TWEEFEED_CONSUMER_URL").unwrap_or_else(|_| DEFAULT_CONSUMER_URL.into());
    Feeder::new(url).send(&batch).await.context("cannot send tweets to consumer")?;
    Ok(())
}
