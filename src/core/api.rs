use crate::core::{CallOrderBackend, ConfigProvider};
use crate::domain::model::{Buyer, CallOrder, Envelope, NewCallOrder, Page, Record, Resource};
use crate::utils::error::{AdminError, Result, FALLBACK_ERROR_MESSAGE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameters understood by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// JSON REST client for the admin backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        crate::utils::validation::validate_url("api.base_url", base_url)?;

        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized).map_err(|e| AdminError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client: Client::new(),
            base_url,
            token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Self::new(config.base_url())?.with_timeout(config.request_timeout());
        Ok(match config.auth_token() {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AdminError::ConfigError {
                message: format!("Cannot build URL for '{}': {}", path, e),
            })?;

        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url).timeout(self.timeout);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(response.json::<Envelope<T>>().await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.send(self.request(Method::GET, path)?).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// Fetches one page of a collection as untyped rows.
    pub async fn list(&self, resource: Resource, query: &ListQuery) -> Result<Page<Record>> {
        let envelope: Envelope<Vec<Record>> = self.get_with_query(resource.path(), query).await?;
        tracing::info!("Fetched {} {} rows", envelope.data.len(), resource);
        Ok(Page {
            rows: envelope.data,
            pagination: envelope.pagination,
        })
    }

    /// Raw CSV blob produced by the backend's export endpoint.
    pub async fn export_csv(&self, resource: Resource, query: &ListQuery) -> Result<Vec<u8>> {
        let path = format!("{}/export", resource.path());
        let response = self.request(Method::GET, &path)?.query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        tracing::debug!("Downloaded {} bytes of {} export", bytes.len(), resource);
        Ok(bytes.to_vec())
    }
}

/// Builds an `Api` error, preferring the envelope's `message` when the body has one.
fn api_error(status: u16, body: &str) -> AdminError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());

    tracing::warn!("API request failed with status {}: {}", status, message);
    AdminError::Api { status, message }
}

#[async_trait::async_trait]
impl CallOrderBackend for ApiClient {
    async fn search_buyers(&self, query: &str) -> Result<Vec<Buyer>> {
        let envelope: Envelope<Vec<Buyer>> = self
            .get_with_query(Resource::Buyers.path(), &[("search", query)])
            .await?;
        Ok(envelope.data)
    }

    async fn submit_call_order(&self, order: &NewCallOrder) -> Result<CallOrder> {
        let envelope: Envelope<CallOrder> = self.post(Resource::CallOrders.path(), order).await?;
        tracing::info!("Created call order {}", envelope.data.id);
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("ftp://example.com").is_err());
    }

    #[test]
    fn test_base_url_gains_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/v1").unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");
    }

    #[tokio::test]
    async fn test_list_returns_rows_and_pagination() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/groups")
                .query_param("page", "2")
                .query_param("perPage", "1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "status": 200,
                    "data": [{"id": "g2", "name": "Auditors"}],
                    "pagination": {"page": 2, "perPage": 1, "total": 2, "totalPages": 2}
                }));
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let query = ListQuery {
            page: Some(2),
            per_page: Some(1),
            search: None,
        };
        let page = client.list(Resource::Groups, &query).await.unwrap();

        api_mock.assert();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].field_text("name"), "Auditors");
        assert_eq!(page.pagination.unwrap().total, 2);
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(DELETE)
                .path("/applications/a1")
                .header("Authorization", "Bearer secret");
            then.status(200)
                .json_body(serde_json::json!({"status": 200, "message": "Deleted", "data": null}));
        });

        let client = ApiClient::new(&server.base_url()).unwrap().with_token("secret");
        let envelope: Envelope<Option<Record>> = client.delete("applications/a1").await.unwrap();

        api_mock.assert();
        assert_eq!(envelope.message.as_deref(), Some("Deleted"));
        assert!(envelope.data.is_none());
    }

    #[tokio::test]
    async fn test_error_uses_server_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::PATCH).path("/bids/b1");
            then.status(422)
                .json_body(serde_json::json!({"status": 422, "message": "Bid already closed"}));
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client
            .patch::<Record, _>("bids/b1", &serde_json::json!({"status": "accepted"}))
            .await
            .unwrap_err();

        match err {
            AdminError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Bid already closed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_without_message_falls_back() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/groups/g1");
            then.status(500).body("upstream exploded");
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let err = client
            .put::<Record, _>("groups/g1", &serde_json::json!({"name": "Ops"}))
            .await
            .unwrap_err();

        assert_eq!(err.user_friendly_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_search_buyers_by_phone_fragment() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/buyers").query_param("search", "2412");
            then.status(200).json_body(serde_json::json!({
                "status": 200,
                "data": [{"id": "b1", "name": "Ama Mensah", "phone": "+233241234567"}]
            }));
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let buyers = client.search_buyers("2412").await.unwrap();

        api_mock.assert();
        assert_eq!(buyers.len(), 1);
        assert_eq!(buyers[0].phone, "+233241234567");
    }

    #[tokio::test]
    async fn test_export_csv_returns_raw_bytes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/sellers/export");
            then.status(200)
                .header("Content-Type", "text/csv")
                .body("id,name\ns1,Kofi\n");
        });

        let client = ApiClient::new(&server.base_url()).unwrap();
        let bytes = client
            .export_csv(Resource::Sellers, &ListQuery::default())
            .await
            .unwrap();

        assert_eq!(String::from_utf8(bytes).unwrap(), "id,name\ns1,Kofi\n");
    }
}
