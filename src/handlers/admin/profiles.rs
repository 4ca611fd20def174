use axum::extract::{rejection::QueryRejection, Extension, Query, State};
use serde::Deserialize;

use crate::admin::{create_admin_client, VerifiedAdmin};
use crate::middleware::{ApiResponse, ApiResult};
use crate::routes::AppState;
use crate::schema::{Profile, Role};

use super::page_size;

#[derive(Debug, Deserialize)]
pub struct ProfilesQuery {
    pub limit: Option<u32>,
    pub role: Option<Role>,
}

/// GET /api/admin/profiles - newest profiles first, optionally by role.
/// Reads across all users, which row-level policies would otherwise forbid.
pub async fn profiles_list(
    State(state): State<AppState>,
    Extension(admin): Extension<VerifiedAdmin>,
    query: Result<Query<ProfilesQuery>, QueryRejection>,
) -> ApiResult<Vec<Profile>> {
    let Query(query) = query?;
    let limit = page_size(query.limit, state.config.api.admin_page_size);

    let client = create_admin_client(&state.config.supabase, &admin)?;
    let mut request = client.from::<Profile>().order("created_at", false).limit(limit);
    if let Some(role) = query.role {
        request = request.eq("role", role);
    }

    Ok(ApiResponse::success(request.fetch().await?))
}
