use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::services::location_map_service::{
    self, LocationFilter, LocationMapError, LocationMapResult,
};
use crate::web::middleware::auth::{AuthenticatedUser, PERMISSION_MEMBER_READ};
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationMapQuery {
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    /// Comma separated segment ids.
    pub segments: Option<String>,
}

fn error_response(err: LocationMapError) -> (StatusCode, Json<Value>) {
    match err {
        LocationMapError::InvalidFilter(detail) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "invalid_filter", "detail": detail })),
        ),
        LocationMapError::DataAccess(e) => {
            warn!("Location map query failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "data_access" })),
            )
        }
    }
}

pub async fn location_map_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Query(query): Query<LocationMapQuery>,
    State(state): State<AppState>,
) -> Result<Json<LocationMapResult>, (StatusCode, Json<Value>)> {
    if !auth_user.has_permission(PERMISSION_MEMBER_READ) {
        warn!(user_id = %auth_user.id, "Location map denied: missing {}", PERMISSION_MEMBER_READ);
        return Err((
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "error": "forbidden" })),
        ));
    }

    let filter = LocationFilter::from_query(
        query.location_type.as_deref(),
        query.segments.as_deref(),
        state.config.location_map_strict_type,
    )
    .map_err(error_response)?;

    location_map_service::get_location_map(&state.pool, &filter)
        .await
        .map(Json)
        .map_err(error_response)
}
