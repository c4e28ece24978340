//! Graceful-shutdown signal future shared by every gRPC/HTTP server binary.

/// Resolves on Ctrl-C or, on Unix, `SIGTERM` — whichever comes first.
/// Intended as the shutdown future passed to
/// `Server::serve_with_shutdown`/`axum::serve(...).with_graceful_shutdown`.
pub async fn signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
