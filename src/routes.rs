use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::{jwt_auth_middleware, require_admin_middleware};

/// Shared, read-only state. Holds configuration only, never a database handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        // Administrative API
        .merge(admin_routes(state.clone()))
        .layer(cors_layer(&state.config));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use handlers::admin;

    Router::new()
        .route("/api/admin/users", get(admin::users_list))
        .route(
            "/api/admin/users/:id",
            get(admin::user_show).delete(admin::user_delete),
        )
        .route("/api/admin/users/:id/role", put(admin::user_role_update))
        .route("/api/admin/profiles", get(admin::profiles_list))
        // Layers run bottom-up: authenticate first, then verify admin
        .layer(middleware::from_fn(require_admin_middleware))
        .layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
