// Privileged database access for administrative request handlers.
//
// The handle returned here authenticates with the service-role key and is not
// subject to row-level policies. Callers must already hold a VerifiedAdmin.

pub mod capability;

use thiserror::Error;

use crate::config::SupabaseConfig;
use crate::supabase::{AdminClient, ClientError, ClientOptions};

pub use capability::{verify_admin, VerifiedAdmin};

/// Deployment defects that prevent building a privileged handle.
#[derive(Debug, Error)]
pub enum AdminClientError {
    #[error("Missing configuration: SUPABASE_URL")]
    MissingUrl,

    #[error("Missing configuration: SUPABASE_SERVICE_ROLE_KEY")]
    MissingServiceRoleKey,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Build a fresh service-role handle for one administrative request.
///
/// Sessions are neither persisted nor refreshed. Nothing is cached between
/// calls; drop the handle when the request is done.
pub fn create_admin_client(
    config: &SupabaseConfig,
    admin: &VerifiedAdmin,
) -> Result<AdminClient, AdminClientError> {
    let url = config.url.trim();
    if url.is_empty() {
        return Err(AdminClientError::MissingUrl);
    }
    let key = config.service_role_key.trim();
    if key.is_empty() {
        return Err(AdminClientError::MissingServiceRoleKey);
    }

    let options = ClientOptions::privileged().with_timeout_secs(config.request_timeout_secs);
    let client = AdminClient::new(url, key, options)?;

    tracing::debug!(handle = %client.id(), admin = %admin.user_id(), "issued admin client");
    Ok(client)
}
