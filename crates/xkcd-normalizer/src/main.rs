use std::path::PathBuf;

use clap::Parser;
use tonic::transport::Server;
use xkcd_normalizer::config::Config;
use xkcd_normalizer::grpc::WordsService;
use xkcd_proto::words::words_server::WordsServer;

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
    tracing::info!(address = %cfg.address, "starting normalizer");

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter.set_serving::<WordsServer<WordsService>>().await;

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(xkcd_proto::FILE_DESCRIPTOR_SET)
        .build_v1()?;

    Server::builder()
        .add_service(WordsServer::new(WordsService))
        .add_service(health_service)
        .add_service(reflection_service)
        .serve_with_shutdown(cfg.address.parse()?, xkcd_types::shutdown::signal())
        .await?;

    tracing::info!("normalizer shut down");
    Ok(())
}
