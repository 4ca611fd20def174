use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::client::{expect_success, read_json, AdminClient};
use super::error::SupabaseError;

/// A user as returned by the auth admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_sign_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub app_metadata: Value,
    #[serde(default)]
    pub user_metadata: Value,
}

impl AdminUser {
    /// Application role stored in `app_metadata.role`.
    pub fn role(&self) -> Option<&str> {
        self.app_metadata.get("role").and_then(Value::as_str)
    }
}

#[derive(Deserialize)]
struct UserPage {
    users: Vec<AdminUser>,
}

/// `/auth/v1/admin` endpoints. Borrowed from an [`AdminClient`].
pub struct AuthAdmin<'a> {
    client: &'a AdminClient,
}

impl<'a> AuthAdmin<'a> {
    pub(crate) fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    /// One page of users; `page` starts at 1.
    pub async fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AdminUser>, SupabaseError> {
        let mut url = self.client.endpoint("auth/v1/admin/users")?;
        url.query_pairs_mut()
            .append_pair("page", &page.max(1).to_string())
            .append_pair("per_page", &per_page.to_string());

        tracing::debug!(handle = %self.client.id(), page, per_page, "list users");
        let response = self.client.http().get(url).send().await?;
        let page: UserPage = read_json(response).await?;
        Ok(page.users)
    }

    /// `None` when the gateway reports no such user.
    pub async fn get_user(&self, id: Uuid) -> Result<Option<AdminUser>, SupabaseError> {
        let url = self.client.endpoint(&format!("auth/v1/admin/users/{}", id))?;

        tracing::debug!(handle = %self.client.id(), user = %id, "get user");
        let response = self.client.http().get(url).send().await?;
        match read_json::<AdminUser>(response).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace the user's `app_metadata` keys with those in `metadata`.
    pub async fn update_app_metadata(&self, id: Uuid, metadata: Value) -> Result<AdminUser, SupabaseError> {
        let url = self.client.endpoint(&format!("auth/v1/admin/users/{}", id))?;

        tracing::debug!(handle = %self.client.id(), user = %id, "update user app_metadata");
        let response = self
            .client
            .http()
            .put(url)
            .json(&json!({ "app_metadata": metadata }))
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), SupabaseError> {
        let url = self.client.endpoint(&format!("auth/v1/admin/users/{}", id))?;

        tracing::debug!(handle = %self.client.id(), user = %id, "delete user");
        let response = self.client.http().delete(url).send().await?;
        expect_success(response).await
    }
}
