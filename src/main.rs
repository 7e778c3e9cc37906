//! APOD Feed - astronomy picture feed client
//!
//! Fetches the week of feed records ending on the configured day and
//! resolves every still image through the in-memory cache.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use futures::future::join_all;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apod_feed::dates::{self, compute_range, compute_range_for_day};
use apod_feed::{
    spawn_expiry_task, AssetResolver, Config, DateRange, FeedRecord, HttpTransport, ImageCache,
    RecordFetcher,
};

/// Main entry point for the feed client.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the image cache and, if entries expire, start the sweep task
/// 4. Fetch the week's records and resolve their images
/// 5. Stop early on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "apod_feed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: endpoint={}, cache_capacity={}, cache_ttl={:?}, timeout={:?}",
        config.base_url, config.cache_capacity, config.cache_ttl, config.request_timeout
    );

    let cache = config.build_cache();
    let sweep_handle = config
        .cache_ttl
        .map(|_| spawn_expiry_task(cache.clone(), config.sweep_interval));

    let transport = Arc::new(
        HttpTransport::new(config.request_timeout).context("failed to build HTTP transport")?,
    );
    let fetcher = RecordFetcher::new(
        config.base_url.clone(),
        Arc::new(config.build_credentials()),
        transport.clone(),
    );
    let resolver = AssetResolver::new(cache.clone(), transport);

    let range = match config.end_date {
        Some(day) => {
            if !dates::is_selectable(day, dates::today()) {
                warn!(
                    "Reference day {} is outside {}..={}",
                    day,
                    dates::lower_bound(),
                    dates::today()
                );
            }
            compute_range_for_day(day)?
        }
        None => compute_range(Utc::now())?,
    };

    let outcome = tokio::select! {
        result = run(&fetcher, &resolver, range) => result,
        _ = shutdown_signal() => {
            warn!("Interrupted before the feed finished loading");
            Ok(())
        }
    };

    if let Some(handle) = sweep_handle {
        handle.abort();
    }
    log_cache_stats(&cache);

    outcome
}

/// Fetches the records for `range` and resolves each still image.
async fn run(
    fetcher: &RecordFetcher,
    resolver: &AssetResolver,
    range: DateRange,
) -> anyhow::Result<()> {
    let records = fetcher
        .fetch_records(&range)
        .await
        .with_context(|| format!("failed to fetch feed records for {}", range))?;

    let (images, others): (Vec<&FeedRecord>, Vec<&FeedRecord>) =
        records.iter().partition(|record| record.is_image());

    for record in &others {
        info!(
            date = %record.date,
            media_type = %record.media_type,
            url = %record.standard_url,
            "Skipping non-image entry"
        );
    }

    let resolved = join_all(images.iter().map(|record| resolver.resolve_preview(record))).await;

    for (record, result) in images.iter().zip(resolved) {
        match result {
            Ok(image) => info!(
                date = %record.date,
                title = %record.title,
                width = image.width(),
                height = image.height(),
                "Resolved image"
            ),
            Err(e) => warn!(date = %record.date, title = %record.title, error = %e, "Image unavailable"),
        }
    }

    Ok(())
}

fn log_cache_stats(cache: &ImageCache) {
    let stats = cache.stats();
    match serde_json::to_string(&stats) {
        Ok(json) => info!(hit_rate = stats.hit_rate(), "Cache stats: {}", json),
        Err(e) => warn!(error = %e, "Failed to serialize cache stats"),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping...");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping...");
        }
    }
}
