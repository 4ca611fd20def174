use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use super::auth_admin::AuthAdmin;
use super::error::{ClientError, SupabaseError};
use super::options::ClientOptions;
use super::query::QueryBuilder;
use super::Table;

/// Authenticated handle to the hosted database gateway.
///
/// Every handle owns its own HTTP client, so two handles never share
/// connection state. The type is deliberately not `Clone`: acquire one per
/// request and let it drop when the request ends.
pub struct AdminClient {
    id: Uuid,
    url: Url,
    options: ClientOptions,
    http: reqwest::Client,
}

impl AdminClient {
    /// Build a handle that authenticates every request with `api_key`.
    ///
    /// No request is sent here; the key is only checked when the gateway
    /// first answers.
    pub fn new(url: &str, api_key: &str, options: ClientOptions) -> Result<Self, ClientError> {
        let mut url = Url::parse(url.trim())?;
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ClientError::UnsupportedScheme(other.to_string())),
        }
        // Url::join replaces the last segment unless the base ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let headers = Self::default_headers(api_key, &options)?;

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if options.global.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(options.global.timeout_secs));
        }
        let http = builder.build().map_err(ClientError::HttpClient)?;

        Ok(Self {
            id: Uuid::new_v4(),
            url,
            options,
            http,
        })
    }

    fn default_headers(api_key: &str, options: &ClientOptions) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();

        for (name, value) in &options.global.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ClientError::InvalidHeader(name.as_str().to_string()))?;
            headers.insert(name, value);
        }

        let mut apikey = HeaderValue::from_str(api_key).map_err(|_| ClientError::InvalidKey)?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ClientError::InvalidKey)?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        Ok(headers)
    }

    /// Per-handle identifier, used in logs instead of anything credential-derived.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The options this handle was constructed with.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// REST endpoint for a table, e.g. `{url}/rest/v1/profiles`.
    pub fn rest_url(&self, table: &str) -> Result<Url, url::ParseError> {
        self.endpoint(&format!("rest/v1/{}", table))
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.url.join(path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Start a query against one of the application's tables.
    pub fn from<T: Table>(&self) -> QueryBuilder<'_, T> {
        QueryBuilder::new(self)
    }

    /// User management endpoints, available only with the service-role key.
    pub fn auth_admin(&self) -> AuthAdmin<'_> {
        AuthAdmin::new(self)
    }
}

impl fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Drop for AdminClient {
    fn drop(&mut self) {
        tracing::trace!(handle = %self.id, "admin client released");
    }
}

/// Decode a successful JSON body, or turn an error status into [`SupabaseError::Api`].
pub(crate) async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, SupabaseError> {
    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(SupabaseError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

/// Like [`read_json`] but discards the body.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<(), SupabaseError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.bytes().await?;
    Err(SupabaseError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Pull a human-readable message out of a gateway error body.
///
/// The REST gateway uses `message`, the auth service uses `msg` or
/// `error_description`.
fn error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        for field in ["message", "msg", "error_description", "error"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "no response body".to_string()
    } else {
        text.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_base_url_with_trailing_slash() {
        let client = AdminClient::new("https://example.supabase.co/base", "key", ClientOptions::privileged()).unwrap();
        assert_eq!(client.url().as_str(), "https://example.supabase.co/base/");
        assert_eq!(
            client.rest_url("profiles").unwrap().as_str(),
            "https://example.supabase.co/base/rest/v1/profiles"
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = AdminClient::new("ftp://example.supabase.co", "key", ClientOptions::privileged()).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedScheme(s) if s == "ftp"));
    }

    #[test]
    fn rejects_key_with_control_characters() {
        let err = AdminClient::new("https://example.supabase.co", "bad\nkey", ClientOptions::privileged()).unwrap_err();
        assert!(matches!(err, ClientError::InvalidKey));
    }

    #[test]
    fn debug_output_has_no_credentials() {
        let client = AdminClient::new("https://example.supabase.co", "service-role-secret", ClientOptions::privileged()).unwrap();
        let rendered = format!("{:?}", client);
        assert!(rendered.contains("example.supabase.co"));
        assert!(!rendered.contains("service-role-secret"));
    }

    #[test]
    fn error_message_prefers_gateway_fields() {
        assert_eq!(error_message(br#"{"message":"permission denied"}"#), "permission denied");
        assert_eq!(error_message(br#"{"msg":"User not found"}"#), "User not found");
        assert_eq!(error_message(b"upstream timeout"), "upstream timeout");
        assert_eq!(error_message(b""), "no response body");
    }
}
