use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Client identification header sent with every request.
pub const CLIENT_INFO_HEADER: &str = "X-Client-Info";
pub const CLIENT_INFO: &str = concat!("timetrack-api/", env!("CARGO_PKG_VERSION"));

/// Options handed to [`super::AdminClient::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    pub auth: AuthOptions,
    pub db: DbOptions,
    pub global: GlobalOptions,
}

/// Session handling for the auth side of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOptions {
    /// Keep the signed-in session around between calls.
    pub persist_session: bool,
    /// Refresh the access token in the background before it expires.
    pub auto_refresh_token: bool,
    /// Pick up a session from an OAuth redirect URL.
    pub detect_session_in_url: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbOptions {
    /// Postgres schema the REST gateway resolves table names against.
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub headers: BTreeMap<String, String>,
    pub timeout_secs: u64,
}

impl Default for AuthOptions {
    fn default() -> Self {
        Self {
            persist_session: true,
            auto_refresh_token: true,
            detect_session_in_url: true,
        }
    }
}

impl Default for DbOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
        }
    }
}

impl Default for GlobalOptions {
    fn default() -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CLIENT_INFO_HEADER.to_string(), CLIENT_INFO.to_string());
        Self {
            headers,
            timeout_secs: 30,
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            auth: AuthOptions::default(),
            db: DbOptions::default(),
            global: GlobalOptions::default(),
        }
    }
}

impl ClientOptions {
    /// Options for a short-lived service-role handle: no session is kept and
    /// nothing refreshes in the background.
    pub fn privileged() -> Self {
        Self {
            auth: AuthOptions {
                persist_session: false,
                auto_refresh_token: false,
                detect_session_in_url: false,
            },
            ..Self::default()
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.global.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_sessions() {
        let options = ClientOptions::default();
        assert!(options.auth.persist_session);
        assert!(options.auth.auto_refresh_token);
        assert_eq!(options.db.schema, "public");
        assert_eq!(options.global.headers.get(CLIENT_INFO_HEADER).map(String::as_str), Some(CLIENT_INFO));
    }

    #[test]
    fn privileged_disables_session_handling() {
        let options = ClientOptions::privileged();
        assert!(!options.auth.persist_session);
        assert!(!options.auth.auto_refresh_token);
        assert!(!options.auth.detect_session_in_url);
        assert_eq!(options.db, DbOptions::default());
    }
}
