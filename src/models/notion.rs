use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A page returned by a Notion database query.
///
/// Property values and the cover are decoded leniently: a value whose payload
/// does not match its declared `type` becomes [`PropertyValue::Unsupported`]
/// instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: HashMap<String, PropertyValue>,
    #[serde(default, deserialize_with = "lenient_cover")]
    pub cover: Option<Cover>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichTextRun> },
    RichText { rich_text: Vec<RichTextRun> },
    Select { select: Option<SelectOption> },
    Status { status: Option<SelectOption> },
    CreatedBy { created_by: PartialUser },
    People { people: Vec<PartialUser> },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// Plain text of the first run of a title property.
    pub fn title_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Title { title } => first_plain_text(title),
            _ => None,
        }
    }

    /// Plain text of the first run of a rich text property.
    pub fn rich_text(&self) -> Option<&str> {
        match self {
            PropertyValue::RichText { rich_text } => first_plain_text(rich_text),
            _ => None,
        }
    }
}

fn first_plain_text(runs: &[RichTextRun]) -> Option<&str> {
    runs.first().map(|run| run.plain_text.as_str())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichTextRun {
    pub plain_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SelectOption {
    pub name: Option<String>,
    pub color: Option<SelectColor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectColor {
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
}

/// User reference. Notion omits `name` and `avatar_url` for partial users.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartialUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cover {
    External { external: FileUrl },
    File { file: FileUrl },
    #[serde(other)]
    Unsupported,
}

impl Cover {
    /// Only externally hosted covers have a stable URL.
    pub fn external_url(&self) -> Option<&str> {
        match self {
            Cover::External { external } => Some(external.url.as_str()),
            Cover::File { .. } | Cover::Unsupported => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileUrl {
    pub url: String,
    #[serde(default)]
    pub expiry_time: Option<String>,
}

/// Response body of `POST /databases/{id}/query`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<RawRecord>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Error object returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

fn lenient_properties<'de, D>(deserializer: D) -> Result<HashMap<String, PropertyValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| {
            let property = serde_json::from_value(value).unwrap_or(PropertyValue::Unsupported);
            (name, property)
        })
        .collect())
}

fn lenient_cover<'de, D>(deserializer: D) -> Result<Option<Cover>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    if raw.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(raw).unwrap_or(Cover::Unsupported)))
}
