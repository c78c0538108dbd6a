// Remote store abstraction for the inventory database

pub mod notion;

pub use notion::NotionClient;

use crate::error::AppResult;
use crate::models::QueryResponse;
use crate::services::query_builder::QueryRequest;

/// Read access to a remote document database.
///
/// The API key is passed on every call; implementations do not keep it.
#[async_trait::async_trait]
pub trait DatabaseStore: Send + Sync {
    /// Run one query against a database and return a single page of records.
    async fn query_database(
        &self,
        api_key: &str,
        database_id: &str,
        query: &QueryRequest,
    ) -> AppResult<QueryResponse>;
}
