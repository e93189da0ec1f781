use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;

use dashboard::config::AppConfig;
use dashboard::services::location_map_service::{self, LocationFilter};

/// Prints the dashboard location map as JSON.
#[derive(Debug, Parser)]
#[command(name = "location_map_report")]
struct Args {
    /// members, organizations or both
    #[arg(long = "type")]
    location_type: Option<String>,

    /// Comma separated segment ids
    #[arg(long)]
    segments: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = AppConfig::from_env()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("cannot connect to database")?;

    let filter = LocationFilter::from_query(
        args.location_type.as_deref(),
        args.segments.as_deref(),
        config.location_map_strict_type,
    )?;
    let result = location_map_service::get_location_map(&pool, &filter).await?;

    let out = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", out);
    Ok(())
}
