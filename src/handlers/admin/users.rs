use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::admin::{create_admin_client, VerifiedAdmin};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::schema::{Profile, Role};
use crate::supabase::AdminUser;

use super::page_size;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// GET /api/admin/users - one page of auth users
pub async fn users_list(
    State(state): State<AppState>,
    Extension(admin): Extension<VerifiedAdmin>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> ApiResult<Vec<AdminUser>> {
    let Query(query) = query?;
    let per_page = page_size(query.per_page, state.config.api.admin_page_size);
    let page = query.page.unwrap_or(1);

    let client = create_admin_client(&state.config.supabase, &admin)?;
    let users = client.auth_admin().list_users(page, per_page).await?;

    Ok(ApiResponse::success(users))
}

/// GET /api/admin/users/:id
pub async fn user_show(
    State(state): State<AppState>,
    Extension(admin): Extension<VerifiedAdmin>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<AdminUser> {
    let Path(id) = path?;
    let client = create_admin_client(&state.config.supabase, &admin)?;
    let user = client
        .auth_admin()
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user))
}

/// PUT /api/admin/users/:id/role - set the application role
///
/// Writes `app_metadata.role` (what access tokens carry) and mirrors it into
/// the user's profile row. If the profile write fails the previous
/// `app_metadata` is put back before the error is returned.
pub async fn user_role_update(
    State(state): State<AppState>,
    Extension(admin): Extension<VerifiedAdmin>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<RoleUpdate>, JsonRejection>,
) -> ApiResult<AdminUser> {
    let Path(id) = path?;
    let Json(body) = body?;

    if id == admin.user_id() && body.role != Role::Admin {
        return Err(ApiError::bad_request("Administrators cannot remove their own admin role"));
    }

    let client = create_admin_client(&state.config.supabase, &admin)?;
    let auth = client.auth_admin();

    let previous = auth
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let user = auth.update_app_metadata(id, json!({ "role": body.role })).await?;

    let mirrored = client
        .from::<Profile>()
        .eq("id", id)
        .update(&json!({ "role": body.role }))
        .await;

    if let Err(err) = mirrored {
        let restore = restorable_metadata(previous.app_metadata);
        if let Err(restore_err) = auth.update_app_metadata(id, restore).await {
            tracing::error!(user = %id, "failed to restore app_metadata after profile update error: {}", restore_err);
        }
        return Err(err.into());
    }

    tracing::info!(
        admin = %admin.user_id(),
        admin_email = admin.email().unwrap_or("-"),
        user = %id,
        role = %body.role,
        "user role updated"
    );
    Ok(ApiResponse::success(user))
}

// Metadata updates merge keys, so a role that was absent has to be cleared
// explicitly.
fn restorable_metadata(previous: Value) -> Value {
    let mut metadata = match previous {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    metadata.entry("role").or_insert(Value::Null);
    Value::Object(metadata)
}

/// DELETE /api/admin/users/:id
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(admin): Extension<VerifiedAdmin>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    if id == admin.user_id() {
        return Err(ApiError::bad_request("Administrators cannot delete their own account"));
    }

    let client = create_admin_client(&state.config.supabase, &admin)?;
    client.auth_admin().delete_user(id).await?;

    tracing::info!(
        admin = %admin.user_id(),
        admin_email = admin.email().unwrap_or("-"),
        user = %id,
        "user deleted"
    );
    Ok(ApiResponse::no_content())
}
