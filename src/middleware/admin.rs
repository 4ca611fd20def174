use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};

use crate::admin::verify_admin;
use crate::error::ApiError;
use super::auth::AuthUser;

/// Middleware that turns an authenticated caller into a `VerifiedAdmin`.
/// Must run after `jwt_auth_middleware`; non-admins are rejected with 403.
pub async fn require_admin_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required before admin verification"))?
        .clone();

    let admin = verify_admin(&auth_user)?;
    tracing::debug!(admin = %admin.user_id(), "admin verified");

    request.extensions_mut().insert(admin);

    Ok(next.run(request).await)
}
