//! Login endpoint, admin-key middleware, and the audit listing.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlstudio_auth::LoginOutcome;

use crate::error::{Result, StudioError};
use crate::net;
use crate::state::AppState;

/// Header carrying the bearer token on authenticated requests.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Routes reachable without a token.
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Routes that sit behind the admin-key middleware with the rest of the
/// console.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/audit", get(recent_audit))
}

/// Gate every protected route on `X-Admin-Key`. Rejection happens here,
/// before any handler or database call runs.
pub async fn require_admin_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let token = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if token.is_empty() || !state.gate.authorize(token) {
        return Err(StudioError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    secret: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
    message: String,
}

async fn login(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let addr = net::client_addr(&headers, peer.map(|ConnectInfo(peer)| peer));

    match state.gate.login(&addr, &request.secret) {
        LoginOutcome::Granted { token } => Ok(Json(LoginResponse {
            success: true,
            token,
            message: "Authentication successful".to_string(),
        })),
        LoginOutcome::Denied { remaining } => Err(StudioError::Denied { remaining }),
        LoginOutcome::Throttled { retry_after } => Err(StudioError::Throttled {
            retry_after_secs: retry_after.as_secs().max(1),
        }),
    }
}

#[derive(Debug, Deserialize)]
struct AuditParams {
    limit: Option<usize>,
}

async fn recent_audit(
    State(state): State<AppState>,
    Query(params): Query<AuditParams>,
) -> Json<Value> {
    let limit = params.limit.unwrap_or(100).min(1000);
    let entries = state.gate.audit_recent(limit);

    Json(json!({
        "success": true,
        "count": entries.len(),
        "entries": entries,
    }))
}
