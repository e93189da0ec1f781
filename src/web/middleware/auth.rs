use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

/// Capability needed to read member and organization locations.
pub const PERMISSION_MEMBER_READ: &str = "memberRead";

#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub permissions: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

#[derive(Deserialize)]
struct JwtPayload {
    sub: String,
    #[serde(default)]
    permissions: Vec<String>,
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find_map(|c| c.strip_prefix("access_token="))
        })
}

// Signature is checked by the gateway in front of us; only the claims are read here.
fn decode_payload(token: &str) -> Option<JwtPayload> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    serde_json::from_slice::<JwtPayload>(&payload_bytes).ok()
}

pub async fn require_auth(mut request: Request, next: Next) -> Response {
    let payload = extract_token(request.headers()).and_then(decode_payload);

    let Some(payload) = payload else {
        tracing::warn!(path = %request.uri().path(), "Rejected request without valid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "unauthorized" })),
        )
            .into_response();
    };

    request.extensions_mut().insert(AuthenticatedUser {
        id: payload.sub,
        permissions: payload.permissions,
    });
    next.run(request).await
}
