//! gRPC client wrapper around the normalizer's `Words` service, used to
//! stem and stop-word-filter an incoming search phrase before either
//! searching variant runs (design §4.2: both `Search` and `ISearch` match
//! against stemmed keywords, never raw query text).

use async_trait::async_trait;
use tokio::sync::Mutex;
use tonic::transport::Channel;
use xkcd_proto::words::words_client::WordsClient;
use xkcd_proto::words::WordsRequest;

use crate::error::Error;

#[async_trait]
pub trait NormalizerClient: Send + Sync {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>, Error>;
}

pub struct GrpcNormalizerClient {
    client: Mutex<WordsClient<Channel>>,
}

impl GrpcNormalizerClient {
    pub async fn connect(address: String) -> Result<Self, Error> {
        let client = WordsClient::connect(address).await?;
        Ok(Self { client: Mutex::new(client) })
    }
}

#[async_trait]
impl NormalizerClient for GrpcNormalizerClient {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>, Error> {
        let mut client = self.client.lock().await;
        let resp = client
            .norm(WordsRequest { phrase: phrase.to_string() })
            .await?;
        Ok(resp.into_inner().words)
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;

    pub struct FakeNormalizerClient {
        pub words: Vec<String>,
    }

    #[async_trait]
    impl NormalizerClient for FakeNormalizerClient {
        async fn norm(&self, _phrase: &str) -> Result<Vec<String>, Error> {
            Ok(self.words.clone())
        }
    }
}
