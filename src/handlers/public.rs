use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::middleware::ApiResponse;
use crate::routes::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Timetrack Admin API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "admin": "/api/admin/users[/:id[/role]], /api/admin/profiles (admin JWT)"
            }
        }
    }))
}

/// GET /health - liveness plus whether privileged credentials are present.
///
/// Reports presence only; no handle is built and nothing about the values
/// is returned.
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "status": "ok",
        "environment": state.config.environment,
        "admin_access_configured": state.config.supabase.is_configured(),
    }))
}
