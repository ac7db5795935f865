//! HTTP client implementation for the Oura V2 API.
//!
//! This module provides a reqwest-based implementation of the [`OuraClient`](crate::OuraClient) trait.

use crate::config::Config;
use crate::{Collection, DailyRecord, ListResponse, OuraClient, OuraError, RangeQuery, TokenStore};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::ExposeSecret;

/// Client for the Oura V2 `usercollection` API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestOuraClient {
    base_url: String,
    tokens: TokenStore,
    client: reqwest::Client,
}

impl ReqwestOuraClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - API root including `/v2/usercollection`
    /// * `tokens` - Token slot read on every request
    pub fn new(base_url: &str, tokens: TokenStore) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            client: reqwest::Client::new(),
        }
    }

    /// Create a client honouring the configured base URL and request timeout.
    pub fn from_config(config: &Config, tokens: TokenStore) -> Result<Self, OuraError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
            client: builder.build()?,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment.
    fn endpoint_url(&self, segments: &[&str]) -> Result<reqwest::Url, OuraError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| OuraError::Config(format!("invalid base url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| OuraError::Config(format!("base url cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a GET request carrying the bearer token, if one is stored.
    async fn get_request(&self, url: reqwest::Url) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match self.tokens.get().await {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// GET the path built from `segments` under the base URL and decode a 200
    /// response as JSON. Any other status becomes [`OuraError::RemoteApi`].
    pub async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, OuraError> {
        let url = self.endpoint_url(segments)?;
        let path = url.path().to_string();
        let mut request = self.get_request(url).await;
        if !query.is_empty() {
            request = request.query(query);
        }
        let resp = request.send().await?;
        let status = resp.status();
        tracing::debug!(path = %path, status = status.as_u16(), "oura api response");
        if status != StatusCode::OK {
            return Err(self.error_from_response(resp).await);
        }
        // Read body as text first so decode failures can show what came back.
        let text = resp.text().await?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            let body_snippet: String = text.chars().take(512).collect();
            OuraError::Decode(format!("{} - body: {}", e, body_snippet))
        })
    }

    async fn error_from_response(&self, resp: reqwest::Response) -> OuraError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        OuraError::RemoteApi { status, body }
    }
}

fn record_request<T>(collection: Collection, result: &Result<T, OuraError>) {
    let outcome = match result {
        Ok(_) => "200".to_string(),
        Err(OuraError::RemoteApi { status, .. }) => status.to_string(),
        Err(_) => "error".to_string(),
    };
    metrics::counter!(
        "oura_api_requests_total",
        "endpoint" => collection.endpoint(),
        "status" => outcome
    )
    .increment(1);
}

#[async_trait]
impl OuraClient for ReqwestOuraClient {
    async fn get_document(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<DailyRecord, OuraError> {
        let result = self.fetch(&[collection.endpoint(), id], &[]).await;
        record_request(collection, &result);
        result
    }

    async fn list_documents(
        &self,
        collection: Collection,
        query: &RangeQuery,
    ) -> Result<ListResponse, OuraError> {
        let result = self
            .fetch(&[collection.endpoint()], &query.query_pairs())
            .await;
        record_request(collection, &result);
        result
    }
}
