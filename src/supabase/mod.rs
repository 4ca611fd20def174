// Client for the hosted Postgres gateway: REST tables under /rest/v1 and
// user management under /auth/v1/admin.

pub mod auth_admin;
pub mod client;
pub mod error;
pub mod options;
pub mod query;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use auth_admin::{AdminUser, AuthAdmin};
pub use client::AdminClient;
pub use error::{ClientError, SupabaseError};
pub use options::{AuthOptions, ClientOptions, DbOptions, GlobalOptions};
pub use query::QueryBuilder;

/// A row type bound to a table in the application schema.
pub trait Table: Serialize + DeserializeOwned + Send + Sync {
    const NAME: &'static str;
}
