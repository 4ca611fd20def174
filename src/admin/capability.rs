use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::schema::Role;

/// Proof that the current caller passed the administrator check.
///
/// The fields are private and the only constructor is [`verify_admin`], so
/// holding one means the check ran for this request.
#[derive(Debug, Clone)]
pub struct VerifiedAdmin {
    user_id: Uuid,
    email: Option<String>,
}

impl VerifiedAdmin {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Check that `user` carries the admin role and issue the capability.
pub fn verify_admin(user: &AuthUser) -> Result<VerifiedAdmin, ApiError> {
    if user.app_role() != Some(Role::Admin.as_str()) {
        tracing::warn!(user = %user.user_id, "admin access denied");
        return Err(ApiError::forbidden("Administrator access required"));
    }

    Ok(VerifiedAdmin {
        user_id: user.user_id,
        email: user.email.clone(),
    })
}
