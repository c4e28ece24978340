use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{middleware as axum_middleware, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use xkcd_gateway::auth::Authenticator;
use xkcd_gateway::clients::Clients;
use xkcd_gateway::config::Config;
use xkcd_gateway::handlers::{self, AppState};
use xkcd_gateway::middleware::{concurrency_cap, rate_limit, require_admin, RateLimiter};
use xkcd_types::model::Credential;

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
    tracing::info!(address = %cfg.address, "starting gateway");

    let clients = Arc::new(
        Clients::connect(
            cfg.ingester_address.clone(),
            cfg.searcher_address.clone(),
            cfg.words_address.clone(),
        )
        .await?,
    );

    let authenticator = Arc::new(Authenticator::new(
        cfg.jwt_secret.clone(),
        Credential { name: cfg.admin_name.clone(), password: cfg.admin_password.clone() },
        cfg.token_ttl,
    ));

    let state = AppState { clients, authenticator: authenticator.clone() };
    let semaphore = Arc::new(Semaphore::new(cfg.concurrency_cap));
    let rate_limiter = Arc::new(RateLimiter::new(cfg.rate_per_sec, cfg.rate_limit_wait));

    let admin_routes = Router::new()
        .route("/api/db/update", post(handlers::db_update))
        .route("/api/db", delete(handlers::db_drop))
        .route_layer(axum_middleware::from_fn_with_state(authenticator, require_admin));

    let app = Router::new()
        .route("/api/ping", get(handlers::ping))
        .route("/api/search", get(handlers::search))
        .route("/api/isearch", get(handlers::isearch))
        .route("/api/db/stats", get(handlers::db_stats))
        .route("/api/db/status", get(handlers::db_status))
        .route("/api/login", post(handlers::login))
        .merge(admin_routes)
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(rate_limiter, rate_limit))
        .layer(axum_middleware::from_fn_with_state(semaphore, concurrency_cap))
        .layer(tower_http::trace::TraceLayer::new_for_http());

    let listener = TcpListener::bind(&cfg.address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(xkcd_types::shutdown::signal())
        .await?;

    tracing::info!("gateway shut down");
    Ok(())
}
