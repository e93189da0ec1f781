use anyhow::Context;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dashboard::config::AppConfig;
use dashboard::web::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv().ok();

    // 1. Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // 2. Database
    info!("Connecting to database: {}", config.database_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("cannot connect to database")?;

    // 3. Application
    let addr = config.socket_addr()?;
    let app = web::router(AppState {
        pool,
        config: Arc::new(config.clone()),
    });

    // 4. Serve, with a fallback port when the configured one is taken
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback = format!("{}:{}", config.host, config.port.saturating_add(1));
            warn!("Could not bind {}: {}. Trying fallback {}", addr, e, fallback);
            tokio::net::TcpListener::bind(&fallback)
                .await
                .with_context(|| format!("cannot bind fallback {}", fallback))?
        }
    };

    info!("Dashboard API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
