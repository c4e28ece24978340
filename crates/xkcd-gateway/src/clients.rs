//! Thin wrappers around the generated gRPC client stubs for the three
//! downstream services, each holding an insecure local-network channel
//! (design §10.5).

use tokio::sync::Mutex;
use tonic::transport::Channel;
use xkcd_proto::common::Empty;
use xkcd_proto::search::search_client::SearchClient;
use xkcd_proto::search::SearchRequest;
use xkcd_proto::update::update_client::UpdateClient;
use xkcd_proto::update::{Status as WireStatus, StatsReply};
use xkcd_proto::words::words_client::WordsClient;

pub struct Clients {
    ingester: Mutex<UpdateClient<Channel>>,
    searcher: Mutex<SearchClient<Channel>>,
    normalizer: Mutex<WordsClient<Channel>>,
}

impl Clients {
    pub async fn connect(
        ingester_address: String,
        searcher_address: String,
        normalizer_address: String,
    ) -> Result<Self, tonic::transport::Error> {
        Ok(Self {
            ingester: Mutex::new(UpdateClient::connect(ingester_address).await?),
            searcher: Mutex::new(SearchClient::connect(searcher_address).await?),
            normalizer: Mutex::new(WordsClient::connect(normalizer_address).await?),
        })
    }

    pub async fn ping_ingester(&self) -> Result<(), tonic::Status> {
        self.ingester.lock().await.ping(Empty {}).await.map(|_| ())
    }

    pub async fn ping_searcher(&self) -> Result<(), tonic::Status> {
        self.searcher.lock().await.ping(Empty {}).await.map(|_| ())
    }

    pub async fn ping_normalizer(&self) -> Result<(), tonic::Status> {
        self.normalizer.lock().await.ping(Empty {}).await.map(|_| ())
    }

    pub async fn update(&self) -> Result<(), tonic::Status> {
        self.ingester.lock().await.update(Empty {}).await.map(|_| ())
    }

    pub async fn status(&self) -> Result<WireStatus, tonic::Status> {
        let reply = self.ingester.lock().await.status(Empty {}).await?.into_inner();
        Ok(WireStatus::try_from(reply.status).unwrap_or(WireStatus::Unspecified))
    }

    pub async fn stats(&self) -> Result<StatsReply, tonic::Status> {
        Ok(self.ingester.lock().await.stats(Empty {}).await?.into_inner())
    }

    pub async fn drop_corpus(&self) -> Result<(), tonic::Status> {
        let mut guard = self.ingester.lock().await;
        UpdateClient::drop(&mut guard, Empty {}).await.map(|_| ())
    }

    pub async fn search(&self, phrase: String, limit: i32) -> Result<(Vec<(i64, String)>, i64), tonic::Status> {
        let reply = self.searcher.lock().await.search(SearchRequest { phrase, limit }).await?.into_inner();
        Ok((reply.comics.into_iter().map(|c| (c.id, c.url)).collect(), reply.total))
    }

    pub async fn isearch(&self, phrase: String, limit: i32) -> Result<(Vec<(i64, String)>, i64), tonic::Status> {
        let reply = self.searcher.lock().await.i_search(SearchRequest { phrase, limit }).await?.into_inner();
        Ok((reply.comics.into_iter().map(|c| (c.id, c.url)).collect(), reply.total))
    }
}
