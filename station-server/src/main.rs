use std::net::SocketAddr;
use std::time::Duration;

use station_server::cache::{CachedProbeClient, ProbeCacheConfig};
use station_server::directory::{
    DirectoryClient, DirectoryClientConfig, DirectoryFeed, FeedCache, FeedCacheConfig, FeedConfig,
    FeedPhase, StationDirectory,
};
use station_server::probe::{ProbeClient, ProbeConfig};
use station_server::web::{AppState, create_router};
use tracing_subscriber::EnvFilter;

/// Read a duration in whole seconds from the environment.
fn env_secs(name: &str, default: u64) -> Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("station_server=info")),
        )
        .init();

    // Discovery feed location
    let feed_url = std::env::var("STATION_FEED_URL").unwrap_or_else(|_| {
        tracing::warn!("STATION_FEED_URL not set; using http://127.0.0.1:12000");
        "http://127.0.0.1:12000".to_string()
    });

    let refresh_interval = env_secs("STATION_REFRESH_SECS", 30);
    let retry_delay = env_secs("STATION_RETRY_SECS", 10);
    let cache_path =
        std::env::var("STATION_CACHE_PATH").unwrap_or_else(|_| "stations_cache.json".to_string());

    // Clients
    let client = DirectoryClient::new(DirectoryClientConfig::new(&feed_url))
        .expect("Failed to create directory client");
    let prober = ProbeClient::new(ProbeConfig::default()).expect("Failed to create probe client");

    let directory = StationDirectory::empty(client, prober.clone());

    // Seed from the disk cache so a restart shows the last-known list
    // while the first live fetch is in flight.
    let disk = FeedCache::new(FeedCacheConfig::new(&cache_path));
    let seeded = match disk.load() {
        Some(records) => {
            let count = directory.seed(records).await;
            tracing::info!(stations = count, "seeded station list from disk cache");
            count > 0
        }
        None => false,
    };

    // Spawn the background feed
    let feed_config = FeedConfig {
        refresh_interval,
        retry_delay,
    };
    let initial_phase = if seeded {
        FeedPhase::Connected
    } else {
        FeedPhase::Loading
    };
    let (feed, feed_handle) = DirectoryFeed::new(directory.clone(), feed_config, initial_phase, Some(disk));
    tokio::spawn(feed.run());

    // Build app state
    let probes = CachedProbeClient::new(prober, &ProbeCacheConfig::default());
    let state = AppState::new(directory, feed_handle, probes);

    // Create router
    let app = create_router(state, "static");

    // Bind and serve
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!("Station dashboard listening on http://{addr}");
    tracing::info!("Endpoints: GET / (dashboard), GET /stations (list), GET /stations/:id (detail), GET /health");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
