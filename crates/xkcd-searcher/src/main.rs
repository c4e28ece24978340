use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;
use xkcd_proto::search::search_server::SearchServer;
use xkcd_searcher::config::Config;
use xkcd_searcher::grpc::SearchService;
use xkcd_searcher::index::InvertedIndex;
use xkcd_searcher::normalizer_client::GrpcNormalizerClient;

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
    tracing::info!(address = %cfg.address, "starting searcher");

    let pool = xkcd_types::db::connect(&cfg.db_address).await?;
    let normalizer = Arc::new(GrpcNormalizerClient::connect(cfg.words_address.clone()).await?);
    let index = Arc::new(InvertedIndex::empty());

    let shutdown = CancellationToken::new();
    let rebuild_handle = tokio::spawn(xkcd_searcher::rebuild::run(
        pool.clone(),
        index.clone(),
        cfg.broker_address.clone(),
        cfg.rebuild_interval,
        shutdown.clone(),
    ));

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<SearchServer<SearchService>>()
        .await;

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(xkcd_proto::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    let service = SearchServer::new(SearchService::new(pool, index, normalizer));

    Server::builder()
        .add_service(service)
        .add_service(health_service)
        .add_service(reflection_service)
        .serve_with_shutdown(cfg.address.parse()?, async move {
            xkcd_types::shutdown::signal().await;
            shutdown.cancel();
        })
        .await?;

    if let Ok(Err(err)) = rebuild_handle.await {
        tracing::error!(error = %err, "index rebuild loop exited with error");
    }

    tracing::info!("searcher shut down");
    Ok(())
}
