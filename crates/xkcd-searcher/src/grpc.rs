//! The `Search` gRPC service (design §6): `Search` is the weaker,
//! always-consistent database-backed lookup; `ISearch` serves from the
//! in-memory index and reports the true total match count. Both normalize
//! the incoming phrase first and short-circuit to an empty result when
//! normalization yields no keywords.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;
use tonic::{Request, Response, Status};
use xkcd_proto::common::Empty;
use xkcd_proto::search::search_server::Search;
use xkcd_proto::search::{Comic as ProtoComic, SearchRequest, SearchResponse};

use crate::index::InvertedIndex;
use crate::normalizer_client::NormalizerClient;

pub struct SearchService {
    pool: PgPool,
    index: Arc<InvertedIndex>,
    normalizer: Arc<dyn NormalizerClient>,
}

impl SearchService {
    pub fn new(pool: PgPool, index: Arc<InvertedIndex>, normalizer: Arc<dyn NormalizerClient>) -> Self {
        Self { pool, index, normalizer }
    }

    /// The wire `limit` is passed straight through, unlike the HTTP
    /// gateway's `parse_limit` which substitutes a default of 10 for a
    /// missing value. A non-positive limit here means "no truncation".
    fn resolve_limit(limit: i32) -> i64 {
        limit as i64
    }
}

#[tonic::async_trait]
impl Search for SearchService {
    async fn ping(&self, _req: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn search(&self, req: Request<SearchRequest>) -> Result<Response<SearchResponse>, Status> {
        let req = req.into_inner();
        let limit = Self::resolve_limit(req.limit);
        let keywords = self.normalizer.norm(&req.phrase).await?;
        if keywords.is_empty() {
            return Ok(Response::new(SearchResponse { comics: Vec::new(), total: 0 }));
        }

        let (comics, total) = xkcd_types::db::search(&self.pool, &keywords, limit)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        Ok(Response::new(SearchResponse {
            comics: comics.into_iter().map(|c| ProtoComic { id: c.id, url: c.url }).collect(),
            total,
        }))
    }

    async fn i_search(&self, req: Request<SearchRequest>) -> Result<Response<SearchResponse>, Status> {
        let req = req.into_inner();
        let limit = Self::resolve_limit(req.limit);
        let keywords: HashSet<String> = self.normalizer.norm(&req.phrase).await?.into_iter().collect();
        let result = self.index.search(&keywords, limit);

        Ok(Response::new(SearchResponse {
            comics: result.comics.into_iter().map(|c| ProtoComic { id: c.id, url: c.url }).collect(),
            total: result.total,
        }))
    }
}
