#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use timetrack_api::auth::{generate_jwt, Claims};
use timetrack_api::config::{AppConfig, SupabaseConfig};
use timetrack_api::{app, AppState};
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "integration-jwt-secret";
pub const SERVICE_KEY: &str = "service-role-secret";

/// Development config pointed at a fake gateway.
pub fn config(supabase_url: &str, service_role_key: &str) -> AppConfig {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.supabase = SupabaseConfig::new(supabase_url, service_role_key);
    config
}

pub fn router(config: AppConfig) -> Router {
    app(AppState::new(config))
}

/// Access token for `user_id` with the given application role.
pub fn token(user_id: Uuid, role: &str) -> String {
    let claims = Claims::new(
        user_id,
        Some(format!("{}@example.com", role)),
        json!({ "provider": "email", "role": role }),
        Duration::hours(1),
    );
    generate_jwt(&claims, JWT_SECRET).expect("sign test token")
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("build request")
}

/// Drive one request through the router; returns status and parsed body
/// (`Value::Null` for empty bodies).
pub async fn send(router: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
