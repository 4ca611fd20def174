use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub admin_page_size: u32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    /// HS256 secret the hosted auth service signs user tokens with.
    #[serde(default, skip_serializing)]
    pub jwt_secret: String,
}

/// Credential pair for the hosted database gateway.
///
/// Both values are read once at startup and never mutated. They are kept as
/// plain strings so that a missing value surfaces as an error from
/// [`crate::admin::create_admin_client`] rather than at load time.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    pub url: String,
    #[serde(default, skip_serializing)]
    pub service_role_key: String,
    pub request_timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            request_timeout_secs: 30,
        }
    }

    /// True when both credentials are present. Says nothing about validity.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.service_role_key.trim().is_empty()
    }
}

impl fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.service_role_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &key)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("cors_origins", &self.cors_origins)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source. `from_env` passes the
    /// process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match get("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(get)
    }

    fn with_overrides(mut self, get: impl Fn(&str) -> Option<String>) -> Self {
        // API overrides
        if let Some(v) = get("API_PORT").or_else(|| get("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Some(v) = get("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Some(v) = get("API_ADMIN_PAGE_SIZE") {
            self.api.admin_page_size = v.parse().unwrap_or(self.api.admin_page_size);
        }

        // Security overrides
        if let Some(v) = get("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(v) = get("SUPABASE_JWT_SECRET") {
            self.security.jwt_secret = v;
        }

        // Hosted database credentials. The public URL name is what the web
        // frontend uses, so accept it as a fallback.
        if let Some(v) = get("SUPABASE_URL").or_else(|| get("NEXT_PUBLIC_SUPABASE_URL")) {
            self.supabase.url = v;
        }
        if let Some(v) = get("SUPABASE_SERVICE_ROLE_KEY") {
            self.supabase.service_role_key = v;
        }
        if let Some(v) = get("SUPABASE_REQUEST_TIMEOUT_SECS") {
            self.supabase.request_timeout_secs = v.parse().unwrap_or(self.supabase.request_timeout_secs);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                admin_page_size: 100,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                jwt_secret: String::new(),
            },
            supabase: SupabaseConfig {
                request_timeout_secs: 30,
                ..SupabaseConfig::default()
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 8080,
                enable_request_logging: true,
                admin_page_size: 50,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://staging.example.com".to_string()],
                jwt_secret: String::new(),
            },
            supabase: SupabaseConfig {
                request_timeout_secs: 15,
                ..SupabaseConfig::default()
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
                admin_page_size: 50,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.example.com".to_string()],
                jwt_secret: String::new(),
            },
            supabase: SupabaseConfig {
                request_timeout_secs: 10,
                ..SupabaseConfig::default()
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn supabase_credentials_come_from_env() {
        let config = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://project.supabase.co"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service-role-secret"),
            ("SUPABASE_REQUEST_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.supabase.url, "https://project.supabase.co");
        assert_eq!(config.supabase.service_role_key, "service-role-secret");
        assert_eq!(config.supabase.request_timeout_secs, 5);
        assert!(config.supabase.is_configured());
    }

    #[test]
    fn public_url_is_a_fallback_only() {
        let config = AppConfig::from_lookup(lookup(&[("NEXT_PUBLIC_SUPABASE_URL", "https://public.supabase.co")]));
        assert_eq!(config.supabase.url, "https://public.supabase.co");
        assert!(!config.supabase.is_configured());

        let config = AppConfig::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://server.supabase.co"),
            ("NEXT_PUBLIC_SUPABASE_URL", "https://public.supabase.co"),
        ]));
        assert_eq!(config.supabase.url, "https://server.supabase.co");
    }

    #[test]
    fn unparseable_numbers_keep_environment_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("SUPABASE_REQUEST_TIMEOUT_SECS", "soon"),
            ("API_PORT", "not-a-port"),
        ]));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.supabase.request_timeout_secs, 10);
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn api_port_wins_over_port() {
        let config = AppConfig::from_lookup(lookup(&[("API_PORT", "4000"), ("PORT", "5000")]));
        assert_eq!(config.api.port, 4000);

        let config = AppConfig::from_lookup(lookup(&[("PORT", "5000")]));
        assert_eq!(config.api.port, 5000);
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.port, 3000);
        assert!(config.api.enable_request_logging);
        assert!(!config.supabase.is_configured());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.supabase.request_timeout_secs, 10);
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn debug_output_redacts_service_role_key() {
        let supabase = SupabaseConfig::new("https://example.supabase.co", "service-role-secret");
        let rendered = format!("{:?}", supabase);
        assert!(rendered.contains("https://example.supabase.co"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("service-role-secret"));
    }

    #[test]
    fn serialized_config_omits_secrets() {
        let mut config = AppConfig::development();
        config.supabase = SupabaseConfig::new("https://example.supabase.co", "service-role-secret");
        config.security.jwt_secret = "jwt-signing-secret".to_string();

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("service-role-secret"));
        assert!(!json.contains("jwt-signing-secret"));
    }

    #[test]
    fn whitespace_credentials_are_not_configured() {
        assert!(!SupabaseConfig::new("  ", "key").is_configured());
        assert!(!SupabaseConfig::new("https://example.supabase.co", "\t").is_configured());
        assert!(SupabaseConfig::new("https://example.supabase.co", "key").is_configured());
    }
}
