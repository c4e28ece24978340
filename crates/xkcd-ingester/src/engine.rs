//! The ingestion engine: run-state machine plus the `Update`/`Stats`/`Drop`
//! operations exposed over gRPC (design §4.1; grounded on the original's
//! `update/core/service.go`). `Update` is guarded by a two-valued run-state
//! so a second call while one is in flight fails fast instead of racing the
//! worker pool against itself.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use xkcd_types::model::{RunState, UpdateStats};

use crate::error::Error;
use crate::eventbus::EventBus;
use crate::normalizer_client::NormalizerClient;
use crate::store::Store;
use crate::worker::Worker;
use crate::xkcd_client::XkcdClient;

pub struct Engine {
    store: Arc<dyn Store>,
    xkcd: Arc<dyn XkcdClient>,
    normalizer: Arc<dyn NormalizerClient>,
    eventbus: Arc<dyn EventBus>,
    concurrency: usize,
    state: Mutex<RunState>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("concurrency", &self.concurrency).finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        store: Arc<dyn Store>,
        xkcd: Arc<dyn XkcdClient>,
        normalizer: Arc<dyn NormalizerClient>,
        eventbus: Arc<dyn EventBus>,
        concurrency: usize,
        shutdown: CancellationToken,
    ) -> Result<Self, Error> {
        if concurrency == 0 {
            return Err(Error::InvalidConcurrency(concurrency));
        }
        Ok(Self {
            store,
            xkcd,
            normalizer,
            eventbus,
            concurrency,
            state: Mutex::new(RunState::Idle),
            shutdown,
        })
    }

    pub async fn status(&self) -> RunState {
        *self.state.lock().await
    }

    /// Runs a full update pass. Fails immediately with
    /// [`Error::UpdateInProgress`] if another pass is already running;
    /// otherwise blocks until every reachable new comic id has been
    /// attempted, with no overall deadline (design §9: long runs expected).
    pub async fn update(&self) -> Result<(), Error> {
        {
            let mut state = self.state.lock().await;
            if *state == RunState::Running {
                return Err(Error::UpdateInProgress);
            }
            *state = RunState::Running;
        }

        let result = self.run_update().await;
        *self.state.lock().await = RunState::Idle;
        result
    }

    async fn run_update(&self) -> Result<(), Error> {
        let latest = self.xkcd.latest_id().await?;
        let saved = self.store.saved_ids().await?;

        let to_fetch: Vec<i64> = (1..=latest)
            .filter(|id| *id != xkcd_types::ABSENT_COMIC_ID && !saved.contains(id))
            .collect();

        if to_fetch.is_empty() {
            tracing::info!("no new comics to fetch, database already up to date");
            return Ok(());
        }
        tracing::info!(count = to_fetch.len(), "fetching new comics");

        let (tx, rx) = mpsc::channel::<i64>(self.concurrency);
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(self.concurrency);
        for _ in 0..self.concurrency {
            let worker = Worker {
                store: self.store.clone(),
                xkcd: self.xkcd.clone(),
                normalizer: self.normalizer.clone(),
                cancel: self.shutdown.clone(),
            };
            let rx = rx.clone();
            handles.push(tokio::spawn(async move { worker.run(rx).await }));
        }

        for id in to_fetch {
            if tx.send(id).await.is_err() {
                break;
            }
        }
        drop(tx);

        for handle in handles {
            let _ = handle.await;
        }

        if let Err(err) = self.eventbus.publish_update().await {
            tracing::error!(error = %err, "failed to publish corpus-update notification");
        }

        Ok(())
    }

    pub async fn stats(&self) -> Result<UpdateStats, Error> {
        let mut stats = self.store.db_stats().await?;
        let latest = self.xkcd.latest_id().await?;
        stats.comics_total = if latest >= xkcd_types::ABSENT_COMIC_ID { latest - 1 } else { latest };
        Ok(stats)
    }

    pub async fn drop_all(&self) -> Result<(), Error> {
        self.store.drop_all().await?;
        if let Err(err) = self.eventbus.publish_update().await {
            tracing::error!(error = %err, "failed to publish corpus-update notification");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex as StdMutex;

    use xkcd_types::model::RemoteComicInfo;

    use super::*;
    use crate::eventbus::fake::FakeEventBus;
    use crate::eventbus::EventBus as _;
    use crate::normalizer_client::fake::FakeNormalizerClient;
    use crate::normalizer_client::NormalizerClient as _;
    use crate::store::fake::FakeStore;
    use crate::store::Store as _;
    use crate::xkcd_client::fake::FakeXkcdClient;
    use crate::xkcd_client::XkcdClient as _;

    fn comic_info(id: i64) -> RemoteComicInfo {
        RemoteComicInfo {
            id,
            img: format!("https://example.test/{id}.png"),
            title: format!("comic {id}"),
            alt: "alt text".into(),
            transcript: String::new(),
            safe_title: format!("comic {id}"),
        }
    }

    fn engine(xkcd: FakeXkcdClient, normalizer: Vec<&str>, store: FakeStore) -> (Engine, Arc<FakeEventBus>) {
        let eventbus = Arc::new(FakeEventBus::default());
        let engine = Engine::new(
            Arc::new(store),
            Arc::new(xkcd),
            Arc::new(FakeNormalizerClient { words: normalizer.into_iter().map(String::from).collect() }),
            eventbus.clone(),
            2,
            CancellationToken::new(),
        )
        .unwrap();
        (engine, eventbus)
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = Engine::new(
            Arc::new(FakeStore::default()),
            Arc::new(FakeXkcdClient::default()),
            Arc::new(FakeNormalizerClient { words: Vec::new() }),
            Arc::new(FakeEventBus::default()),
            0,
            CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConcurrency(0)));
    }

    #[tokio::test]
    async fn status_starts_idle() {
        let (engine, _bus) = engine(FakeXkcdClient::default(), Vec::new(), FakeStore::default());
        assert_eq!(engine.status().await, RunState::Idle);
    }

    #[test]
    fn filters_absent_comic_and_already_saved() {
        let saved: std::collections::HashSet<i64> = [1, 2].into_iter().collect();
        let latest = 5;
        let to_fetch: Vec<i64> = (1..=latest)
            .filter(|id| *id != xkcd_types::ABSENT_COMIC_ID && !saved.contains(id))
            .collect();
        assert_eq!(to_fetch, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn fake_normalizer_is_consulted_per_comic() {
        let xkcd = Arc::new(FakeXkcdClient {
            latest: 1,
            comics: StdMutex::new(HashMap::from([(1, comic_info(1))])),
            ..Default::default()
        });
        let normalizer = Arc::new(FakeNormalizerClient { words: vec!["alt".into(), "text".into()] });
        let eventbus = Arc::new(FakeEventBus::default());

        let info = xkcd.fetch(1).await.unwrap();
        let words = normalizer.norm(&info.alt).await.unwrap();
        assert_eq!(words, vec!["alt".to_string(), "text".to_string()]);

        eventbus.publish_update().await.unwrap();
        assert_eq!(eventbus.publishes.load(Ordering::SeqCst), 1);
    }

    /// Drives the full `update()` pipeline against fakes for every
    /// collaborator (store, remote corpus, normalizer, event bus), with no
    /// live Postgres, mirroring the original's `TestUpdate`.
    #[tokio::test]
    async fn update_fetches_normalizes_persists_and_publishes_once() {
        let xkcd = FakeXkcdClient {
            latest: 3,
            comics: StdMutex::new(HashMap::from([
                (1, comic_info(1)),
                (2, comic_info(2)),
                (3, comic_info(3)),
            ])),
            ..Default::default()
        };
        let (engine, eventbus) = engine(xkcd, vec!["alt", "text"], FakeStore::default());

        engine.update().await.unwrap();

        let saved = engine.store.saved_ids().await.unwrap();
        assert_eq!(saved, [1, 2, 3].into_iter().collect());
        assert_eq!(eventbus.publishes.load(Ordering::SeqCst), 1);
        assert_eq!(engine.status().await, RunState::Idle);

        let stats = engine.store.db_stats().await.unwrap();
        assert_eq!(stats.comics_fetched, 3);
        assert_eq!(stats.words_unique, 2);
    }

    #[tokio::test]
    async fn update_skips_already_saved_ids() {
        let xkcd = FakeXkcdClient {
            latest: 2,
            comics: StdMutex::new(HashMap::from([(1, comic_info(1)), (2, comic_info(2))])),
            ..Default::default()
        };
        let store = FakeStore::default();
        store.upsert_comic(&xkcd_types::model::Comic {
            id: 1,
            url: "https://example.test/1.png".into(),
            title: "comic 1".into(),
            alt: "alt text".into(),
            transcript: String::new(),
            safe_title: "comic 1".into(),
            words: vec!["stale".into()],
        })
        .await
        .unwrap();
        let (engine, _bus) = engine(xkcd, vec!["alt", "text"], store);

        engine.update().await.unwrap();

        let saved = engine.store.saved_ids().await.unwrap();
        assert_eq!(saved, [1, 2].into_iter().collect());
        // Comic 1 was already saved, so run_update never refetched it and
        // its stale keyword set survives untouched.
        assert_eq!(engine.store.db_stats().await.unwrap().comics_fetched, 2);
    }

    #[tokio::test]
    async fn concurrent_update_is_rejected() {
        let xkcd = FakeXkcdClient { latest: 0, ..Default::default() };
        let (engine, _bus) = engine(xkcd, Vec::new(), FakeStore::default());

        *engine.state.lock().await = RunState::Running;
        let err = engine.update().await.unwrap_err();
        assert!(matches!(err, Error::UpdateInProgress));
    }
}
