//! Publishes corpus-change notifications to NATS so the searcher can rebuild
//! its in-memory index (design §4.2; grounded on the original's use of
//! `nats-io/nats.go` for the same subject).

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Error;

#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish_update(&self) -> Result<(), Error>;
}

pub struct NatsEventBus {
    client: async_nats::Client,
}

impl NatsEventBus {
    pub async fn connect(address: &str) -> Result<Self, Error> {
        let client = async_nats::connect(address)
            .await
            .map_err(|e| Error::EventBus(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl EventBus for NatsEventBus {
    async fn publish_update(&self) -> Result<(), Error> {
        self.client
            .publish(xkcd_types::CORPUS_UPDATED_SUBJECT, Bytes::from_static(b"updated"))
            .await
            .map_err(|e| Error::EventBus(e.to_string()))?;
        self.client
            .flush()
            .await
            .map_err(|e| Error::EventBus(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct FakeEventBus {
        pub publishes: AtomicUsize,
    }

    #[async_trait]
    impl EventBus for FakeEventBus {
        async fn publish_update(&self) -> Result<(), Error> {
            self.publishes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
