//! Keeps the in-memory index fresh: builds it once at startup, then rebuilds
//! on a fixed ticker and whenever the ingester publishes a corpus-update
//! notification. Both triggers funnel through the same single-writer loop,
//! so rebuilds never run concurrently with each other.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::index::{IndexSnapshot, InvertedIndex};

pub async fn rebuild_once(pool: &PgPool, index: &InvertedIndex) -> Result<(), Error> {
    let rows = xkcd_types::db::scan_all(pool).await?;
    let snapshot = IndexSnapshot::from_rows(rows);
    let count = snapshot.len();
    index.swap(snapshot);
    tracing::info!(count, "rebuilt in-memory index");
    Ok(())
}

pub async fn run(
    pool: PgPool,
    index: Arc<InvertedIndex>,
    broker_address: String,
    interval: Duration,
    shutdown: CancellationToken,
) -> Result<(), Error> {
    rebuild_once(&pool, &index).await?;

    let client = async_nats::connect(&broker_address)
        .await
        .map_err(|e| Error::EventBus(e.to_string()))?;
    let mut subscription = client
        .subscribe(xkcd_types::CORPUS_UPDATED_SUBJECT)
        .await
        .map_err(|e| Error::EventBus(e.to_string()))?;

    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("index rebuild loop shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Err(err) = rebuild_once(&pool, &index).await {
                    tracing::error!(error = %err, "periodic index rebuild failed");
                }
            }
            msg = subscription.next() => {
                match msg {
                    Some(_) => {
                        if let Err(err) = rebuild_once(&pool, &index).await {
                            tracing::error!(error = %err, "event-triggered index rebuild failed");
                        }
                    }
                    None => {
                        tracing::warn!("corpus-update subscription closed");
                        return Ok(());
                    }
                }
            }
        }
    }
}
