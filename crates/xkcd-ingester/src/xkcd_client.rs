//! HTTP client for the remote comic corpus (design §4.1; grounded on the
//! original's `update/adapters/xkcd/xkcd.go`). `LatestId` reads `info.0.json`
//! at the corpus root; `Fetch` reads `{id}/info.0.json`.

use async_trait::async_trait;
use xkcd_types::model::RemoteComicInfo;

use crate::error::Error;

#[async_trait]
pub trait XkcdClient: Send + Sync {
    async fn latest_id(&self) -> Result<i64, Error>;
    async fn fetch(&self, id: i64) -> Result<RemoteComicInfo, Error>;
}

pub struct HttpXkcdClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpXkcdClient {
    pub fn new(base_url: String, timeout: std::time::Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl XkcdClient for HttpXkcdClient {
    async fn latest_id(&self) -> Result<i64, Error> {
        #[derive(serde::Deserialize)]
        struct Latest {
            num: i64,
        }
        let url = format!("{}/info.0.json", self.base_url.trim_end_matches('/'));
        let latest: Latest = self.http.get(&url).send().await?.error_for_status()?.json().await?;
        Ok(latest.num)
    }

    async fn fetch(&self, id: i64) -> Result<RemoteComicInfo, Error> {
        let url = format!("{}/{}/info.0.json", self.base_url.trim_end_matches('/'), id);
        let info = self.http.get(&url).send().await?.error_for_status()?.json().await?;
        Ok(info)
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct FakeXkcdClient {
        pub latest: i64,
        pub comics: Mutex<HashMap<i64, RemoteComicInfo>>,
        pub fail_ids: Mutex<HashMap<i64, usize>>,
    }

    #[async_trait]
    impl XkcdClient for FakeXkcdClient {
        async fn latest_id(&self) -> Result<i64, Error> {
            Ok(self.latest)
        }

        async fn fetch(&self, id: i64) -> Result<RemoteComicInfo, Error> {
            if let Some(remaining) = self.fail_ids.lock().unwrap().get_mut(&id) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(Error::EventBus(format!("simulated failure for {id}")));
                }
            }
            self.comics
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| Error::EventBus(format!("no fake comic for {id}")))
        }
    }
}
