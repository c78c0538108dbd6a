use reqwest::Client;
use std::time::Duration;

use super::DatabaseStore;
use crate::error::{AppError, AppResult};
use crate::models::{NotionErrorBody, QueryResponse};
use crate::services::query_builder::QueryRequest;

/// API version sent with every request.
pub const NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
}

impl NotionClient {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn query_url(&self, database_id: &str) -> String {
        format!("{}/databases/{}/query", self.base_url, database_id)
    }
}

#[async_trait::async_trait]
impl DatabaseStore for NotionClient {
    async fn query_database(
        &self,
        api_key: &str,
        database_id: &str,
        query: &QueryRequest,
    ) -> AppResult<QueryResponse> {
        tracing::debug!("Querying Notion database {}", database_id);

        let response = self
            .client
            .post(self.query_url(database_id))
            .bearer_auth(api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error: NotionErrorBody =
                serde_json::from_str(&body).unwrap_or_else(|_| NotionErrorBody {
                    code: String::new(),
                    message: format!("Notion API error: {} - {}", status, body),
                });
            return Err(AppError::Notion {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        let page: QueryResponse = response.json().await?;
        tracing::debug!(
            "Notion returned {} records (has_more={})",
            page.results.len(),
            page.has_more
        );
        Ok(page)
    }
}
