use crate::config::PropertyNames;
use crate::models::{
    Cover, Creator, InventoryItem, PropertyValue, RawRecord, SelectOption, Tag, TEXT_PLACEHOLDER,
};

/// Maps Notion pages onto [`InventoryItem`].
///
/// Normalization never fails: a property that is missing or carries another
/// type falls back to `"--"` for text fields and `None` for structured ones.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    names: PropertyNames,
}

impl Normalizer {
    pub fn new(names: PropertyNames) -> Self {
        Self { names }
    }

    pub fn normalize(&self, raw: &RawRecord) -> InventoryItem {
        let names = &self.names;
        let prop = |name: &str| raw.properties.get(name);

        InventoryItem {
            id: raw.id.clone(),
            name: text_or_placeholder(prop(&names.name).and_then(PropertyValue::title_text)),
            creator: prop(&names.creator).and_then(creator),
            box_id: rich_text_field(prop(&names.box_id)),
            utem_code: rich_text_field(prop(&names.utem_code)),
            internal_code: rich_text_field(prop(&names.internal_code)),
            concept: rich_text_field(prop(&names.concept)),
            location_or_borrowed_by: rich_text_field(prop(&names.location_or_borrowed_by)),
            image: raw
                .cover
                .as_ref()
                .and_then(Cover::external_url)
                .map(str::to_string),
            property: prop(&names.property).and_then(select_tag),
            designated_location: prop(&names.designated_location).and_then(select_tag),
            circumstance: prop(&names.circumstance).and_then(select_tag),
            status: prop(&names.status).and_then(status_tag),
        }
    }
}

fn text_or_placeholder(text: Option<&str>) -> String {
    text.unwrap_or(TEXT_PLACEHOLDER).to_string()
}

fn rich_text_field(value: Option<&PropertyValue>) -> String {
    text_or_placeholder(value.and_then(PropertyValue::rich_text))
}

fn creator(value: &PropertyValue) -> Option<Creator> {
    match value {
        PropertyValue::CreatedBy { created_by } => Some(Creator {
            id: created_by.id.clone(),
            name: created_by.name.clone(),
            avatar: created_by.avatar_url.clone(),
        }),
        _ => None,
    }
}

fn select_tag(value: &PropertyValue) -> Option<Tag> {
    match value {
        PropertyValue::Select { select } => Some(tag(select.as_ref())),
        _ => None,
    }
}

fn status_tag(value: &PropertyValue) -> Option<Tag> {
    match value {
        PropertyValue::Status { status } => Some(tag(status.as_ref())),
        _ => None,
    }
}

// A matching property with no option chosen still yields a tag with empty fields.
fn tag(option: Option<&SelectOption>) -> Tag {
    Tag {
        value: option.and_then(|o| o.name.clone()),
        color: option.and_then(|o| o.color),
    }
}
