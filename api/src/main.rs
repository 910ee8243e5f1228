/// VidGrab Site API Server
///
/// Backend for the VidGrab marketing website.
/// Proxies read-only GitHub release data: download counters, star count,
/// changelog entries, plus the coming-soon countdown.
mod routes;

use std::sync::Arc;

use tracing::info;
use vidgrab_shared::aggregator::ReleaseAggregator;
use vidgrab_shared::config::SiteConfig;
use vidgrab_shared::github::{GithubClient, ReleaseSource};

/// Shared application state for all API handlers.
pub struct AppState {
    pub config: SiteConfig,
    pub source: Arc<dyn ReleaseSource>,
    pub aggregator: ReleaseAggregator,
}

impl AppState {
    pub fn new(config: SiteConfig, source: Arc<dyn ReleaseSource>) -> Self {
        let aggregator = ReleaseAggregator::new(source.clone(), config.aggregator.clone());
        Self {
            config,
            source,
            aggregator,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidgrab_api=info,vidgrab_shared=info,tower_http=info".into()),
        )
        .init();

    // Config
    let config = SiteConfig::from_env()?;
    info!(
        "Upstream: {}/repos/{}/{} (token: {})",
        config.github.api_url,
        config.github.owner,
        config.github.repo,
        if config.github.token.is_some() { "set" } else { "none" }
    );

    let client = GithubClient::new(config.github.clone())?;
    let addr = config.bind_addr();
    let state = Arc::new(AppState::new(config, Arc::new(client)));

    let app = routes::router(state);

    // Bind
    info!("VidGrab site API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
