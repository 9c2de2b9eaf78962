use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, EnvFilter};

use wayfind_core::GraphCache;
use wayfind_service::config::Config;
use wayfind_service::store::RouteStore;
use wayfind_service::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cfg = Config::from_env()?;
    let db_path = cfg
        .db_path
        .clone()
        .context("WAYFIND_DB must point at the campus database")?;
    let state = AppState {
        db_path,
        store: Arc::new(RouteStore::new(cfg.route_ttl)),
        cache: cfg.graph_cache.then(|| Arc::new(GraphCache::new(8))),
    };
    let app = build_router(state);

    tracing::info!(
        core_version = %wayfind_core::version(),
        addr = %cfg.addr(),
        "starting wayfind-service"
    );
    let listener = tokio::net::TcpListener::bind(cfg.addr()).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
