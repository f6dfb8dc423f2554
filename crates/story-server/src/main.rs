mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use story_api::rate_limit::{self, RateLimiter};
use story_api::state::{AppState, AppStateInner};
use story_filter::ProfanityFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "story_server=debug,story_api=debug,story_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Init database
    let db = story_db::Database::open(&config.db_path)?;
    let filter = ProfanityFilter::with_extra_words(&config.extra_blocked_words)?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, filter });
    let limiter = Arc::new(RateLimiter::new(
        config.rate_limit_max,
        config.rate_limit_window,
    ));

    tokio::spawn(rate_limit::run_prune_loop(limiter.clone()));

    let app = story_api::router(state, limiter);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Story Wall listening on {}", addr);
    info!(
        "Rate limit: {} requests per {}s per address",
        config.rate_limit_max,
        config.rate_limit_window.as_secs()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
