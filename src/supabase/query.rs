use serde::Serialize;
use std::fmt::Display;
use std::marker::PhantomData;
use url::Url;

use super::client::{read_json, AdminClient};
use super::error::SupabaseError;
use super::Table;

const PREFER_REPRESENTATION: &str = "return=representation";

/// Builder for a single REST gateway request against table `T`.
///
/// Filters and modifiers accumulate; one of the terminal methods
/// (`fetch`, `fetch_optional`, `insert`, `update`, `delete`) sends it.
pub struct QueryBuilder<'a, T: Table> {
    client: &'a AdminClient,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    limit: Option<u32>,
    _table: PhantomData<T>,
}

impl<'a, T: Table> QueryBuilder<'a, T> {
    pub(crate) fn new(client: &'a AdminClient) -> Self {
        Self {
            client,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            _table: PhantomData,
        }
    }

    /// Columns to return, comma separated. Defaults to `*`.
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The request URL with select, filters, order and limit encoded.
    pub fn url(&self) -> Result<Url, SupabaseError> {
        let mut url = self.client.rest_url(T::NAME)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &self.columns);
            for (column, filter) in &self.filters {
                pairs.append_pair(column, filter);
            }
            if let Some((column, ascending)) = &self.order {
                let direction = if *ascending { "asc" } else { "desc" };
                pairs.append_pair("order", &format!("{}.{}", column, direction));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }

    fn schema(&self) -> &str {
        &self.client.options().db.schema
    }

    pub async fn fetch(self) -> Result<Vec<T>, SupabaseError> {
        let url = self.url()?;
        tracing::debug!(table = T::NAME, handle = %self.client.id(), "select");

        let response = self
            .client
            .http()
            .get(url)
            .header("Accept-Profile", self.schema())
            .send()
            .await?;

        read_json(response).await
    }

    /// First matching row, if any.
    pub async fn fetch_optional(self) -> Result<Option<T>, SupabaseError> {
        let rows = self.limit(1).fetch().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn insert(self, rows: &[T]) -> Result<Vec<T>, SupabaseError> {
        let url = self.url()?;
        tracing::debug!(table = T::NAME, handle = %self.client.id(), count = rows.len(), "insert");

        let response = self
            .client
            .http()
            .post(url)
            .header("Content-Profile", self.schema())
            .header("Prefer", PREFER_REPRESENTATION)
            .json(rows)
            .send()
            .await?;

        read_json(response).await
    }

    /// Patch every row matching the filters. At least one filter is required.
    pub async fn update<P: Serialize + ?Sized>(self, patch: &P) -> Result<Vec<T>, SupabaseError> {
        if self.filters.is_empty() {
            return Err(SupabaseError::UnfilteredMutation("update"));
        }
        let url = self.url()?;
        tracing::debug!(table = T::NAME, handle = %self.client.id(), "update");

        let response = self
            .client
            .http()
            .patch(url)
            .header("Content-Profile", self.schema())
            .header("Prefer", PREFER_REPRESENTATION)
            .json(patch)
            .send()
            .await?;

        read_json(response).await
    }

    /// Delete every row matching the filters. At least one filter is required.
    pub async fn delete(self) -> Result<Vec<T>, SupabaseError> {
        if self.filters.is_empty() {
            return Err(SupabaseError::UnfilteredMutation("delete"));
        }
        let url = self.url()?;
        tracing::debug!(table = T::NAME, handle = %self.client.id(), "delete");

        let response = self
            .client
            .http()
            .delete(url)
            .header("Content-Profile", self.schema())
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;

        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Profile;
    use crate::supabase::ClientOptions;

    fn client() -> AdminClient {
        AdminClient::new("https://example.supabase.co", "key", ClientOptions::privileged()).unwrap()
    }

    #[test]
    fn encodes_filters_order_and_limit() {
        let client = client();
        let url = client
            .from::<Profile>()
            .select("id,email,role")
            .eq("role", "admin")
            .order("created_at", false)
            .limit(25)
            .url()
            .unwrap();

        assert_eq!(url.path(), "/rest/v1/profiles");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "id,email,role".to_string()),
                ("role".to_string(), "eq.admin".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "25".to_string()),
            ]
        );
    }

    #[test]
    fn defaults_to_all_columns() {
        let client = client();
        let url = client.from::<Profile>().url().unwrap();
        assert_eq!(url.query(), Some("select=*"));
    }

    #[tokio::test]
    async fn unfiltered_mutations_are_refused_locally() {
        let client = client();

        let err = client.from::<Profile>().delete().await.unwrap_err();
        assert!(matches!(err, SupabaseError::UnfilteredMutation("delete")));

        let err = client
            .from::<Profile>()
            .update(&serde_json::json!({ "role": "member" }))
            .await
            .unwrap_err();
        assert!(matches!(err, SupabaseError::UnfilteredMutation("update")));
    }

    #[tokio::test]
    async fn insert_asks_for_representation() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        let profile = Profile {
            id: uuid::Uuid::new_v4(),
            email: Some("new@example.com".to_string()),
            full_name: None,
            role: crate::schema::Role::Member,
            created_at: chrono::Utc::now(),
            updated_at: None,
        };

        Mock::given(method("POST"))
            .and(path("/rest/v1/profiles"))
            .and(header("prefer", "return=representation"))
            .and(header("content-profile", "public"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([profile.clone()])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AdminClient::new(&mock_server.uri(), "key", ClientOptions::privileged()).unwrap();
        let rows = client.from::<Profile>().insert(&[profile.clone()]).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, profile.id);
    }

    #[tokio::test]
    async fn fetch_optional_limits_to_one_row() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/profiles"))
            .and(query_param("email", "eq.nobody@example.com"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AdminClient::new(&mock_server.uri(), "key", ClientOptions::privileged()).unwrap();
        let row = client
            .from::<Profile>()
            .eq("email", "nobody@example.com")
            .fetch_optional()
            .await
            .unwrap();

        assert!(row.is_none());
    }
}
