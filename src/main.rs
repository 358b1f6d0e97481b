//! Query Cache - An admission-gated in-memory result cache
//!
//! Runs the cache service standalone so its reaper and diagnostics can be
//! observed outside of the query engine.

use anyhow::Context;
use serde_json::Value;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use query_cache::{CacheService, Config};

/// Main entry point for the query cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the cache service and its reaper
/// 4. Wait for SIGINT/SIGTERM
/// 5. Log final diagnostics and stop the service
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "query_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting query cache");

    let config = Config::from_env();
    let service: CacheService<String, Value> = CacheService::start(config);
    log_details(&service).await?;

    shutdown_signal().await?;

    log_details(&service).await?;
    let stats = service.stats().await;
    info!(
        "Lifetime stats: hits={}, misses={}, hit_rate={:.2}, rejections={}, refreshes={}, reaped_entries={}",
        stats.hits,
        stats.misses,
        stats.hit_rate(),
        stats.admission_rejections,
        stats.refreshes,
        stats.reaped_entries
    );

    service.stop().await;
    info!("Shutdown complete");
    Ok(())
}

async fn log_details(service: &CacheService<String, Value>) -> anyhow::Result<()> {
    match service.cache_details().await {
        Some(details) => {
            let json = serde_json::to_string(&details).context("serializing cache details")?;
            info!("Cache details: {}", json);
        }
        None => info!("Cache details unavailable"),
    }
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("installing SIGTERM handler")?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.context("installing Ctrl+C handler")?;
                info!("Received Ctrl+C, initiating shutdown...");
            }
            _ = terminate.recv() => {
                info!("Received SIGTERM, initiating shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .context("installing Ctrl+C handler")?;
        info!("Received Ctrl+C, initiating shutdown...");
    }

    Ok(())
}
