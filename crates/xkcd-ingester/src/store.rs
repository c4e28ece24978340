//! Storage port for the `comics` table (design §10.6): abstracted behind a
//! trait, like [`crate::xkcd_client::XkcdClient`]/[`crate::normalizer_client::NormalizerClient`]/
//! [`crate::eventbus::EventBus`], so [`crate::engine::Engine::update`] can be driven
//! end-to-end against an in-memory fake with no live Postgres (grounded on
//! the original's `TestUpdate` in `update/core/service_test.go`, which mocks
//! its `DB` port the same way).

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::PgPool;
use xkcd_types::model::{Comic, UpdateStats};

use crate::error::Error;

#[async_trait]
pub trait Store: Send + Sync {
    async fn saved_ids(&self) -> Result<HashSet<i64>, Error>;
    async fn upsert_comic(&self, comic: &Comic) -> Result<(), Error>;
    async fn drop_all(&self) -> Result<(), Error>;
    async fn db_stats(&self) -> Result<UpdateStats, Error>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn saved_ids(&self) -> Result<HashSet<i64>, Error> {
        Ok(xkcd_types::db::saved_ids(&self.pool).await?)
    }

    async fn upsert_comic(&self, comic: &Comic) -> Result<(), Error> {
        Ok(xkcd_types::db::upsert_comic(&self.pool, comic).await?)
    }

    async fn drop_all(&self) -> Result<(), Error> {
        Ok(xkcd_types::db::drop_all(&self.pool).await?)
    }

    async fn db_stats(&self) -> Result<UpdateStats, Error> {
        Ok(xkcd_types::db::db_stats(&self.pool).await?)
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct FakeStore {
        pub comics: Mutex<HashMap<i64, Comic>>,
    }

    #[async_trait]
    impl Store for FakeStore {
        async fn saved_ids(&self) -> Result<HashSet<i64>, Error> {
            Ok(self.comics.lock().unwrap().keys().copied().collect())
        }

        async fn upsert_comic(&self, comic: &Comic) -> Result<(), Error> {
            self.comics.lock().unwrap().insert(comic.id, comic.clone());
            Ok(())
        }

        async fn drop_all(&self) -> Result<(), Error> {
            self.comics.lock().unwrap().clear();
            Ok(())
        }

        async fn db_stats(&self) -> Result<UpdateStats, Error> {
            let comics = self.comics.lock().unwrap();
            let words_total = comics.values().map(|c| c.words.len() as i64).sum();
            let words_unique: i64 = comics
                .values()
                .flat_map(|c| c.words.iter())
                .collect::<HashSet<_>>()
                .len() as i64;
            Ok(UpdateStats {
                words_total,
                words_unique,
                comics_fetched: comics.len() as i64,
                comics_total: 0,
            })
        }
    }
}
