pub mod middleware;
pub mod routes;

use axum::{middleware as axum_middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use routes::{health, location_map};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
}

pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/dashboard/location-map",
            get(location_map::location_map_handler),
        )
        .layer(axum_middleware::from_fn(middleware::auth::require_auth));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(protected_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
