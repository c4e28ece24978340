use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use xkcd_ingester::config::Config;
use xkcd_ingester::engine::Engine;
use xkcd_ingester::eventbus::NatsEventBus;
use xkcd_ingester::grpc::UpdateService;
use xkcd_ingester::normalizer_client::GrpcNormalizerClient;
use xkcd_ingester::store::PgStore;
use xkcd_ingester::xkcd_client::HttpXkcdClient;
use xkcd_proto::update::update_server::UpdateServer;

#[derive(Parser)]
struct Args {
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let cfg = Config::must_load(Some(args.config));
    xkcd_types::logging::init(&cfg.log_level);

    if let Err(err) = run(cfg).await {
        tracing::error!(error = %err, "server failed");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(address = %cfg.address, "starting ingester");

    let pool = xkcd_types::db::connect(&cfg.db_address).await?;
    let store = Arc::new(PgStore::new(pool));
    let xkcd = Arc::new(HttpXkcdClient::new(cfg.xkcd.url.clone(), cfg.xkcd.timeout)?);
    let normalizer = Arc::new(GrpcNormalizerClient::connect(cfg.words_address.clone()).await?);
    let eventbus = Arc::new(NatsEventBus::connect(&cfg.broker_address).await?);

    let shutdown = CancellationToken::new();
    let engine = Arc::new(Engine::new(
        store,
        xkcd,
        normalizer,
        eventbus,
        cfg.xkcd.concurrency,
        shutdown.clone(),
    )?);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<UpdateServer<UpdateService>>()
        .await;

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(xkcd_proto::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let service = UpdateServer::new(UpdateService::new(engine));

    Server::builder()
        .add_service(service)
        .add_service(health_service)
        .add_service(reflection_service)
        .serve_with_shutdown(cfg.address.parse()?, async move {
            xkcd_types::shutdown::signal().await;
            shutdown.cancel();
        })
        .await?;

    tracing::info!("ingester shut down");
    Ok(())
}
