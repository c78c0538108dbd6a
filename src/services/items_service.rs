use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{ItemLookup, ItemPage, QueryResponse};
use crate::services::normalizer::Normalizer;
use crate::services::query_builder::QueryBuilder;
use crate::store::DatabaseStore;

/// Read-only access to the inventory database.
///
/// Each call issues exactly one query to the store.
#[derive(Clone)]
pub struct ItemsService {
    store: Arc<dyn DatabaseStore>,
    api_key: String,
    database_id: String,
    queries: QueryBuilder,
    normalizer: Normalizer,
}

impl ItemsService {
    pub fn new(store: Arc<dyn DatabaseStore>, config: &Config) -> Self {
        Self {
            store,
            api_key: config.notion_api_key.clone(),
            database_id: config.notion_database_id.clone(),
            queries: QueryBuilder::new(config.property_names.clone()),
            normalizer: Normalizer::new(config.property_names.clone()),
        }
    }

    /// List items matching an optional search term.
    pub async fn list_items(&self, term: Option<&str>, cursor: Option<&str>) -> AppResult<ItemPage> {
        tracing::info!("ListItems called: query={:?}, cursor={:?}", term, cursor);

        let query = self.queries.list_query(term, cursor);
        let response = self
            .store
            .query_database(&self.api_key, &self.database_id, &query)
            .await?;

        Ok(self.to_page(response))
    }

    /// Find the item with the given internal code.
    pub async fn find_item(&self, inventory_id: &str, cursor: Option<&str>) -> AppResult<ItemLookup> {
        tracing::info!("FindItem called: id={}, cursor={:?}", inventory_id, cursor);

        let query = self.queries.item_query(inventory_id, cursor);
        let response = self
            .store
            .query_database(&self.api_key, &self.database_id, &query)
            .await?;

        if response.results.is_empty() {
            tracing::info!("No item with internal code {}", inventory_id);
            return Ok(ItemLookup::NotFound);
        }

        Ok(ItemLookup::Found(self.to_page(response)))
    }

    fn to_page(&self, response: QueryResponse) -> ItemPage {
        ItemPage {
            results: response
                .results
                .iter()
                .map(|raw| self.normalizer.normalize(raw))
                .collect(),
            has_more: response.has_more,
            next_cursor: response.next_cursor,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::PropertyNames;
    use crate::error::AppError;
    use crate::models::RawRecord;
    use crate::services::query_builder::{Filter, QueryRequest};
    use serde_json::json;
    use std::sync::Mutex;

    /// Store that returns a canned response and records what it was asked.
    pub(crate) struct FakeStore {
        response: Mutex<Option<AppResult<QueryResponse>>>,
        pub(crate) calls: Mutex<Vec<(String, String, QueryRequest)>>,
    }

    impl FakeStore {
        pub(crate) fn returning(response: AppResult<QueryResponse>) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(Some(response)),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl DatabaseStore for FakeStore {
        async fn query_database(
            &self,
            api_key: &str,
            database_id: &str,
            query: &QueryRequest,
        ) -> AppResult<QueryResponse> {
            self.calls.lock().unwrap().push((
                api_key.to_string(),
                database_id.to_string(),
                query.clone(),
            ));
            self.response
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(AppError::Internal("store called twice".to_string())))
        }
    }

    pub(crate) fn test_config() -> Config {
        Config {
            notion_api_key: "secret_key".to_string(),
            notion_database_id: "db-1".to_string(),
            notion_api_url: "http://localhost".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            clerk_jwks_url: "http://localhost/jwks".to_string(),
            clerk_issuer: None,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            property_names: PropertyNames::default(),
        }
    }

    pub(crate) fn drill_record() -> RawRecord {
        serde_json::from_value(json!({
            "id": "page-1",
            "properties": {
                "Nombre": { "type": "title", "title": [{ "plain_text": "Drill" }] },
                "Código Interno": { "type": "rich_text", "rich_text": [{ "plain_text": "XDEV-001" }] }
            }
        }))
        .unwrap()
    }

    pub(crate) fn page_of(results: Vec<RawRecord>, has_more: bool, next_cursor: Option<&str>) -> QueryResponse {
        QueryResponse {
            results,
            has_more,
            next_cursor: next_cursor.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_items_normalizes_results() {
        let store = FakeStore::returning(Ok(page_of(vec![drill_record()], true, Some("next"))));
        let service = ItemsService::new(store.clone(), &test_config());

        let page = service.list_items(Some("drill"), Some("cur")).await.unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "Drill");
        assert_eq!(page.results[0].internal_code, "XDEV-001");
        assert!(page.has_more);
        assert_eq!(page.next_cursor.as_deref(), Some("next"));

        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (api_key, database_id, query) = &calls[0];
        assert_eq!(api_key, "secret_key");
        assert_eq!(database_id, "db-1");
        assert_eq!(query.page_size, Some(15));
        assert_eq!(query.start_cursor.as_deref(), Some("cur"));
    }

    #[tokio::test]
    async fn test_list_items_empty_is_a_page() {
        let store = FakeStore::returning(Ok(page_of(vec![], false, None)));
        let service = ItemsService::new(store, &test_config());

        let page = service.list_items(None, None).await.unwrap();

        assert_eq!(
            page,
            ItemPage {
                results: vec![],
                has_more: false,
                next_cursor: None,
            }
        );
    }

    #[tokio::test]
    async fn test_find_item_not_found() {
        let store = FakeStore::returning(Ok(page_of(vec![], false, None)));
        let service = ItemsService::new(store.clone(), &test_config());

        let lookup = service.find_item("XDEV-404", None).await.unwrap();

        assert_eq!(lookup, ItemLookup::NotFound);
        let calls = store.calls.lock().unwrap();
        let Filter::And(clauses) = &calls[0].2.filter;
        assert_eq!(clauses.len(), 1);
        assert!(calls[0].2.page_size.is_none());
    }

    #[tokio::test]
    async fn test_find_item_returns_every_match() {
        let mut second = drill_record();
        second.id = "page-2".to_string();
        let store = FakeStore::returning(Ok(page_of(vec![drill_record(), second], false, None)));
        let service = ItemsService::new(store, &test_config());

        match service.find_item("XDEV-001", None).await.unwrap() {
            ItemLookup::Found(page) => {
                let ids: Vec<_> = page.results.iter().map(|i| i.id.as_str()).collect();
                assert_eq!(ids, vec!["page-1", "page-2"]);
            }
            ItemLookup::NotFound => panic!("expected a page"),
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = FakeStore::returning(Err(AppError::Internal("network down".to_string())));
        let service = ItemsService::new(store, &test_config());

        let err = service.list_items(Some("drill"), None).await.unwrap_err();
        assert!(err.to_string().contains("network down"));
    }
}
