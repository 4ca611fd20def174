// handlers/admin - administrative endpoints
//
// Every route here sits behind jwt_auth_middleware + require_admin_middleware,
// so handlers receive a VerifiedAdmin extension. Each handler builds its own
// privileged handle from that capability and drops it on return; handles are
// never stored in router state.

pub mod profiles; // GET /api/admin/profiles
pub mod users;    // /api/admin/users[/:id[/role]]

pub use profiles::profiles_list;
pub use users::{user_delete, user_role_update, user_show, users_list};

/// Clamp a client-requested page size to the configured maximum.
pub(crate) fn page_size(requested: Option<u32>, max: u32) -> u32 {
    let max = max.max(1);
    requested.unwrap_or(max).clamp(1, max)
}
