use serde::Serialize;

use crate::config::PropertyNames;

/// Search terms starting with this prefix are treated as internal codes.
pub const INTERNAL_CODE_PREFIX: &str = "XDEV-";

/// Page size used when listing items.
pub const LIST_PAGE_SIZE: u32 = 15;

/// Body of a Notion database query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    pub filter: Filter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    And(Vec<PropertyFilter>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    RichText(TextCondition),
    Title(TextCondition),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextCondition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_not_empty: Option<bool>,
}

/// Translates search terms and item codes into Notion filters.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    names: PropertyNames,
}

impl QueryBuilder {
    pub fn new(names: PropertyNames) -> Self {
        Self { names }
    }

    /// Query for the item list.
    ///
    /// A term starting with `XDEV-` (in any case) matches internal codes
    /// containing the uppercased term. Any other term, or none, matches items
    /// with a non-empty internal code whose name contains the term as given.
    pub fn list_query(&self, term: Option<&str>, cursor: Option<&str>) -> QueryRequest {
        let upper = term.map(str::to_uppercase);

        let clauses = match upper {
            Some(code) if code.starts_with(INTERNAL_CODE_PREFIX) => {
                vec![self.internal_code(TextCondition {
                    contains: Some(code),
                    ..Default::default()
                })]
            }
            _ => vec![
                self.internal_code(TextCondition {
                    is_not_empty: Some(true),
                    ..Default::default()
                }),
                PropertyFilter {
                    property: self.names.name.clone(),
                    condition: Condition::Title(TextCondition {
                        contains: Some(term.unwrap_or_default().to_string()),
                        ..Default::default()
                    }),
                },
            ],
        };

        QueryRequest {
            start_cursor: cursor.map(str::to_string),
            filter: Filter::And(clauses),
            page_size: Some(LIST_PAGE_SIZE),
        }
    }

    /// Query for a single item by exact internal code. The code is not
    /// case-normalized, and the page size is left to Notion.
    pub fn item_query(&self, inventory_id: &str, cursor: Option<&str>) -> QueryRequest {
        QueryRequest {
            start_cursor: cursor.map(str::to_string),
            filter: Filter::And(vec![self.internal_code(TextCondition {
                equals: Some(inventory_id.to_string()),
                ..Default::default()
            })]),
            page_size: None,
        }
    }

    fn internal_code(&self, condition: TextCondition) -> PropertyFilter {
        PropertyFilter {
            property: self.names.internal_code.clone(),
            condition: Condition::RichText(condition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_json(query: &QueryRequest) -> serde_json::Value {
        serde_json::to_value(query).unwrap()
    }

    #[test]
    fn test_list_query_with_internal_code_prefix() {
        let query = QueryBuilder::default().list_query(Some("xdev-001"), None);

        assert_eq!(
            to_json(&query),
            json!({
                "filter": {
                    "and": [
                        { "property": "Código Interno", "rich_text": { "contains": "XDEV-001" } }
                    ]
                },
                "page_size": 15
            })
        );
    }

    #[test]
    fn test_list_query_with_name_term() {
        let query = QueryBuilder::default().list_query(Some("drill"), Some("cursor-1"));

        assert_eq!(
            to_json(&query),
            json!({
                "start_cursor": "cursor-1",
                "filter": {
                    "and": [
                        { "property": "Código Interno", "rich_text": { "is_not_empty": true } },
                        { "property": "Nombre", "title": { "contains": "drill" } }
                    ]
                },
                "page_size": 15
            })
        );
    }

    #[test]
    fn test_list_query_without_term_matches_everything_named() {
        let query = QueryBuilder::default().list_query(None, None);

        let Filter::And(clauses) = &query.filter;
        assert_eq!(clauses.len(), 2);
        assert_eq!(
            clauses[1].condition,
            Condition::Title(TextCondition {
                contains: Some(String::new()),
                ..Default::default()
            })
        );
        assert_eq!(query.page_size, Some(LIST_PAGE_SIZE));
        assert!(query.start_cursor.is_none());
    }

    #[test]
    fn test_list_query_name_clause_never_sets_equals() {
        let query = QueryBuilder::default().list_query(Some("Taladro XDEV-1"), None);

        let Filter::And(clauses) = &query.filter;
        assert_eq!(
            clauses[0].condition,
            Condition::RichText(TextCondition {
                is_not_empty: Some(true),
                ..Default::default()
            })
        );
        assert_eq!(
            clauses[1].condition,
            Condition::Title(TextCondition {
                contains: Some("Taladro XDEV-1".to_string()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_item_query_keeps_case() {
        let query = QueryBuilder::default().item_query("xdev-001", None);

        assert_eq!(
            to_json(&query),
            json!({
                "filter": {
                    "and": [
                        { "property": "Código Interno", "rich_text": { "equals": "xdev-001" } }
                    ]
                }
            })
        );
    }

    #[test]
    fn test_item_query_passes_cursor_through() {
        let query = QueryBuilder::default().item_query("XDEV-001", Some("opaque=="));

        assert_eq!(query.start_cursor.as_deref(), Some("opaque=="));
        assert!(query.page_size.is_none());
        let Filter::And(clauses) = &query.filter;
        assert_eq!(
            clauses[0].condition,
            Condition::RichText(TextCondition {
                equals: Some("XDEV-001".to_string()),
                ..Default::default()
            })
        );
    }
}
