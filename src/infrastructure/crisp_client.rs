//! HTTP adapter for the Crisp REST API.
//!
//! Exposes the two read operations the export pipeline consumes behind the
//! `ConversationSource` trait, so the pipeline can also run against test doubles.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;

use crate::domain::config::CrispConfig;
use crate::domain::{ApiResponse, AppError, Credentials, DateFilter, Result};

/// Conversations requested per page.
pub const PAGE_SIZE: u32 = 50;

/// Header identifying the caller's token tier.
const TIER_HEADER: &str = "X-Crisp-Tier";
const TIER_PLUGIN: &str = "plugin";

/// Read operations of the remote conversation/message API.
#[async_trait]
pub trait ConversationSource: Send + Sync {
    /// Fetch one page (1-based) of conversations.
    async fn list_conversations(
        &self,
        credentials: &Credentials,
        page: u32,
        filter: &DateFilter,
    ) -> Result<ApiResponse>;

    /// Fetch all messages of one conversation.
    async fn list_messages(&self, credentials: &Credentials, session_id: &str)
        -> Result<ApiResponse>;
}

/// `reqwest`-backed Crisp API client.
pub struct CrispClient {
    client: Client,
    base_url: String,
}

impl CrispClient {
    /// Build a client from the API settings.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(config: &CrispConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(AppError::http)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn conversations_url(&self, website_id: &str, page: u32) -> String {
        format!(
            "{}/website/{}/conversations/{page}",
            self.base_url,
            urlencoding::encode(website_id)
        )
    }

    fn messages_url(&self, website_id: &str, session_id: &str) -> String {
        format!(
            "{}/website/{}/conversation/{}/messages",
            self.base_url,
            urlencoding::encode(website_id),
            urlencoding::encode(session_id)
        )
    }

    /// Issue an authenticated GET and decode the response envelope.
    async fn get(
        &self,
        credentials: &Credentials,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse> {
        tracing::debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .basic_auth(&credentials.identifier, Some(&credentials.secret_key))
            .header(TIER_HEADER, TIER_PLUGIN)
            .header(ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(AppError::http)?;

        let status = response.status();
        let body = response.bytes().await.map_err(AppError::http)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "Crisp API request failed");
            return Err(upstream_error(status.as_u16(), &body));
        }

        let decoded: Value = serde_json::from_slice(&body).map_err(|e| AppError::Fetch {
            status: Some(status.as_u16()),
            reason: None,
            message: Some(format!("malformed response body: {e}")),
            source: None,
        })?;

        Ok(ApiResponse::from_body(decoded))
    }
}

#[async_trait]
impl ConversationSource for CrispClient {
    async fn list_conversations(
        &self,
        credentials: &Credentials,
        page: u32,
        filter: &DateFilter,
    ) -> Result<ApiResponse> {
        let url = self.conversations_url(&credentials.website_id, page);
        let per_page = PAGE_SIZE.to_string();

        let mut query = vec![("per_page", per_page.as_str())];
        query.extend(filter.query_pairs());

        self.get(credentials, &url, &query).await
    }

    async fn list_messages(
        &self,
        credentials: &Credentials,
        session_id: &str,
    ) -> Result<ApiResponse> {
        if session_id.is_empty() {
            return Err(AppError::upstream(
                400,
                None,
                Some("session_id required".to_string()),
            ));
        }

        let url = self.messages_url(&credentials.website_id, session_id);
        self.get(credentials, &url, &[]).await
    }
}

/// Build a fetch error from a Crisp error body (`{"reason": .., "data": {"message": ..}}`).
fn upstream_error(status: u16, body: &[u8]) -> AppError {
    let payload: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    let reason = payload
        .get("reason")
        .and_then(Value::as_str)
        .map(ToString::to_string);
    let message = payload
        .get("data")
        .and_then(|d| d.get("message"))
        .or_else(|| payload.get("message"))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    AppError::upstream(status, reason, message)
}
