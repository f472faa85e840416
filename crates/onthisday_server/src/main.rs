use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

use onthisday_archive::config::Config;
use onthisday_archive::seed::{self, SeedData};
use onthisday_archive::{ArchiveStore, InMemoryStore};
use onthisday_server::middleware::LoggingStore;
use onthisday_server::{AppState, router};

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Log filter from `ONTHISDAY_LOG_LEVEL`, then `RUST_LOG`, default `info`.
    let log_env = std::env::var("ONTHISDAY_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(log_env.clone())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();
    info!(%log_env, "onthisday_server: log filter");

    let handle = PrometheusBuilder::new().install_recorder()?;

    let config = Config::from_env()?;
    if config.jwt.using_development_key {
        warn!("ONTHISDAY_JWT_KEY not set; signing admin tokens with the development key");
    }

    let store: Arc<dyn ArchiveStore> = Arc::new(LoggingStore::new(InMemoryStore::new()));
    let data = SeedData::load(config.seed_file.as_deref()).await?;
    match seed::apply(store.as_ref(), &data).await? {
        Some(report) => info!(?report, "archive seeded"),
        None => info!("archive already populated; seed skipped"),
    }

    let state = AppState::new(store, &config).with_metrics(handle);

    let max_body_size = env_parse::<usize>("MAX_HTTP_BODY_SIZE").unwrap_or(1024 * 1024);
    let timeout_secs = env_parse::<u64>("REQUEST_TIMEOUT_SECS").unwrap_or(30);

    let app = router(state)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(timeout_secs)));

    let addr: SocketAddr = std::env::var("ADDRESS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!(%addr, max_body_bytes = max_body_size, timeout_secs, "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                tracing::error!("failed to listen for ctrl+c: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("server stopped");
    Ok(())
}
