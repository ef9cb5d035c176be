use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use intermodal_server::network::NetworkHandle;
use intermodal_server::planner::{JourneyPlanner, SearchConfig};
use intermodal_server::provider::{
    CacheConfig, CachedProvider, OtpClient, OtpConfig, StraightLineProvider,
};
use intermodal_server::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("intermodal_server=info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("BIND_ADDR must be a socket address");

    let network = NetworkHandle::default();
    let search_config = SearchConfig::default();
    let cache_config = CacheConfig::default();

    // Without an OTP server, fall back to straight-line itineraries
    let app = match std::env::var("OTP_BASE_URL") {
        Ok(base_url) => {
            info!(%base_url, "Using OpenTripPlanner");
            let client =
                OtpClient::new(OtpConfig::new(base_url)).expect("Failed to create OTP client");
            let provider = CachedProvider::new(client, &cache_config);
            create_router(AppState::new(JourneyPlanner::new(
                network,
                Arc::new(provider),
                search_config,
            )))
        }
        Err(_) => {
            warn!("OTP_BASE_URL not set, serving straight-line itineraries");
            let provider = CachedProvider::new(StraightLineProvider::new(), &cache_config);
            create_router(AppState::new(JourneyPlanner::new(
                network,
                Arc::new(provider),
                search_config,
            )))
        }
    };

    info!(%addr, "Intermodal journey planner listening");
    info!("  GET  /health          - Health check");
    info!("  GET  /network/stats   - Graph size");
    info!("  POST /network/expand  - Grow the graph from OD pairs");
    info!("  POST /journey/plan    - Plan a journey");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
