//! Request and response shapes of the schema service.
//!
//! Query structs deserialize straight from URL query strings, so every
//! parameter arrives as an optional string and is validated by the service.

use serde::{Deserialize, Serialize};

use crate::descriptor::{FieldDescriptor, NestedTypeDefinition};
use crate::types::{EntryType, Section};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsQuery {
    pub section_handle: Option<String>,
    pub type_handle: Option<String>,
    pub section_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypesQuery {
    pub section_handle: Option<String>,
    pub section_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTypeSummary {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub has_title_field: bool,
    /// Custom fields of the top-level layout; nested fields are not counted.
    pub field_count: usize,
}

impl EntryTypeSummary {
    pub fn new(entry_type: &EntryType, field_count: usize) -> Self {
        Self {
            id: entry_type.id,
            handle: entry_type.handle.clone(),
            name: entry_type.name.clone(),
            has_title_field: entry_type.title.has_title_field,
            field_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsResponse {
    pub section: Section,
    pub entry_type: EntryTypeSummary,
    pub fields: Vec<FieldDescriptor>,
    pub nested_types: Vec<NestedTypeDefinition>,
}

/// Names of the containers a listed field came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLabels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_set: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainedField {
    #[serde(flatten)]
    pub field: FieldDescriptor,
    #[serde(flatten)]
    pub labels: ContainerLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityFieldsResponse {
    pub entity_type: String,
    pub fields: Vec<ContainedField>,
    pub nested_types: Vec<NestedTypeDefinition>,
}
