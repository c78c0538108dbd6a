use serde::Serialize;

use super::notion::SelectColor;

/// Placeholder for text fields that are missing or have an unexpected type.
pub const TEXT_PLACEHOLDER: &str = "--";

/// Inventory item in the shape served to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub creator: Option<Creator>,
    #[serde(rename = "box")]
    pub box_id: String,
    pub utem_code: String,
    pub internal_code: String,
    pub concept: String,
    pub location_or_borrowed_by: String,
    pub image: Option<String>,
    pub property: Option<Tag>,
    pub designated_location: Option<Tag>,
    pub circumstance: Option<Tag>,
    pub status: Option<Tag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Creator {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// A select or status value with its display color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub value: Option<String>,
    pub color: Option<SelectColor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPage {
    pub results: Vec<InventoryItem>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Outcome of looking up a single item by internal code.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemLookup {
    Found(ItemPage),
    NotFound,
}

pub const NOT_FOUND_MESSAGE: &str = "No se encontró ese objeto";

#[derive(Debug, Clone, Serialize)]
pub struct NotFoundBody {
    pub error: &'static str,
}

impl Default for NotFoundBody {
    fn default() -> Self {
        Self {
            error: NOT_FOUND_MESSAGE,
        }
    }
}
