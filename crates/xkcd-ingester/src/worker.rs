//! A single worker in the bounded-concurrency pool that drains the
//! to-fetch queue during `Update` (design §4.1; grounded on the original's
//! `update/core/service.go` worker-pool pipeline). Each item is fetched and
//! normalized with independent bounded retries; a normalizer failure after
//! exhausting retries degrades to an empty keyword set rather than dropping
//! the comic, since the xkcd corpus entry itself still fetched successfully.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use xkcd_types::model::Comic;
use xkcd_types::retry::{self, Outcome};

use crate::normalizer_client::NormalizerClient;
use crate::store::Store;
use crate::xkcd_client::XkcdClient;

pub(crate) struct Worker {
    pub store: Arc<dyn Store>,
    pub xkcd: Arc<dyn XkcdClient>,
    pub normalizer: Arc<dyn NormalizerClient>,
    pub cancel: CancellationToken,
}

impl Worker {
    pub async fn run(self, rx: Arc<Mutex<mpsc::Receiver<i64>>>) {
        loop {
            let id = {
                let mut rx = rx.lock().await;
                rx.recv().await
            };
            let Some(id) = id else { break };
            self.process(id).await;
        }
    }

    async fn process(&self, id: i64) {
        let xkcd = self.xkcd.clone();
        let info = match retry::retry(
            &self.cancel,
            || {
                let xkcd = xkcd.clone();
                async move { xkcd.fetch(id).await }
            },
            |attempt, err| {
                tracing::warn!(id, attempt = attempt + 1, error = %err, "failed to fetch comic, retrying");
            },
        )
        .await
        {
            Outcome::Ok(info) => info,
            Outcome::Cancelled => return,
            Outcome::Exhausted(err) => {
                tracing::error!(id, error = %err, "failed to fetch comic after all attempts, skipping");
                return;
            }
        };

        let mut comic = Comic {
            id,
            url: info.img,
            title: info.title,
            alt: info.alt,
            transcript: info.transcript,
            safe_title: info.safe_title,
            words: Vec::new(),
        };
        let norm_input = comic.normalization_input();

        let normalizer = self.normalizer.clone();
        comic.words = match retry::retry(
            &self.cancel,
            || {
                let normalizer = normalizer.clone();
                let phrase = norm_input.clone();
                async move { normalizer.norm(&phrase).await }
            },
            |attempt, err| {
                tracing::warn!(id, attempt = attempt + 1, error = %err, "failed to normalize words, retrying");
            },
        )
        .await
        {
            Outcome::Ok(words) => words,
            Outcome::Cancelled => return,
            Outcome::Exhausted(err) => {
                tracing::error!(id, error = %err, "failed to normalize words after all attempts, saving without keywords");
                Vec::new()
            }
        };

        if let Err(err) = self.store.upsert_comic(&comic).await {
            tracing::error!(id, error = %err, "failed to save comic");
        }
    }
}
