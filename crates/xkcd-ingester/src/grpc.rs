//! The `Update` gRPC service (design §6; grounded on the original's
//! `update/adapters/grpc/server.go`): a thin wire layer over [`Engine`].

use std::sync::Arc;

use tonic::{Request, Response, Status};
use xkcd_proto::common::Empty;
use xkcd_proto::update::update_server::Update;
use xkcd_proto::update::{Status as WireStatus, StatsReply, StatusReply};
use xkcd_types::model::RunState;

use crate::engine::Engine;

pub struct UpdateService {
    engine: Arc<Engine>,
}

impl UpdateService {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }
}

#[tonic::async_trait]
impl Update for UpdateService {
    async fn ping(&self, _req: Request<Empty>) -> Result<Response<Empty>, Status> {
        Ok(Response::new(Empty {}))
    }

    async fn update(&self, _req: Request<Empty>) -> Result<Response<Empty>, Status> {
        self.engine.update().await?;
        Ok(Response::new(Empty {}))
    }

    async fn status(&self, _req: Request<Empty>) -> Result<Response<StatusReply>, Status> {
        let status = match self.engine.status().await {
            RunState::Idle => WireStatus::Idle,
            RunState::Running => WireStatus::Running,
        };
        Ok(Response::new(StatusReply { status: status as i32 }))
    }

    async fn stats(&self, _req: Request<Empty>) -> Result<Response<StatsReply>, Status> {
        let stats = self.engine.stats().await?;
        Ok(Response::new(StatsReply {
            words_total: stats.words_total,
            words_unique: stats.words_unique,
            comics_fetched: stats.comics_fetched,
            comics_total: stats.comics_total,
        }))
    }

    async fn drop(&self, _req: Request<Empty>) -> Result<Response<Empty>, Status> {
        self.engine.drop_all().await?;
        Ok(Response::new(Empty {}))
    }
}
