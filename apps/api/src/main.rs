mod advisor;
mod ai_enhanced;
mod aptitude;
mod auth;
mod catalog;
mod config;
mod dashboard;
mod db;
mod errors;
mod fallback;
mod llm_client;
mod models;
mod recommendations;
mod routes;
mod state;
mod store;
mod upstream;
mod user;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{DbGateway, PoolConfig};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgStore;
use crate::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerPath API v{}", env!("CARGO_PKG_VERSION"));

    // Connect and migrate up front; a database that is down stops startup.
    let gateway = Arc::new(DbGateway::new(
        config.database_url.clone(),
        PoolConfig::from_config(&config),
    ));
    gateway
        .connect()
        .await
        .context("Failed to connect to PostgreSQL")?;
    gateway
        .migrate()
        .await
        .context("Failed to run database migrations")?;
    info!("PostgreSQL ready");

    let upstream =
        UpstreamClient::from_config(&config).context("Failed to build upstream client")?;
    info!(
        "Recommendation backend at {} (timeout {}s, {} retries)",
        config.fastapi_base_url, config.upstream_timeout_secs, config.upstream_max_retries
    );

    let llm = LlmClient::from_config(&config).context("Failed to build LLM client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store: Arc::new(PgStore::new(gateway)),
        upstream,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
