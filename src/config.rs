use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Runtime settings read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    /// Reject an unknown `type` on the location map instead of widening to both.
    pub location_map_strict_type: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env_parse("PORT", 3000u16);
        let db_max_connections = env_parse("DB_MAX_CONNECTIONS", 5u32).max(1);
        let db_acquire_timeout = Duration::from_secs(env_parse("DB_ACQUIRE_TIMEOUT_SECS", 5u64));
        let location_map_strict_type = env::var("LOCATION_MAP_STRICT_TYPE")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            host,
            port,
            db_max_connections,
            db_acquire_timeout,
            location_map_strict_type,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("cannot parse listen address {}:{}", self.host, self.port))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
