//! Output contract: flat field descriptors and nested type definitions.

use serde::{Deserialize, Serialize};

use crate::classify::SemanticType;
use crate::types::BlockTypeSettings;

/// One field as seen by a translation client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "fieldName")]
    pub name: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,
    pub is_localizable: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Variant typeIds, in resolution order. Only set on composite fields.
    #[serde(rename = "typeIds", skip_serializing_if = "Option::is_none")]
    pub composite_type_refs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl FieldDescriptor {
    /// Descriptor for a field the host does not store (title, slug, ...).
    pub fn native(
        name: &str,
        display_name: &str,
        semantic_type: SemanticType,
        is_localizable: bool,
    ) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            display_name: display_name.to_string(),
            semantic_type,
            is_localizable,
            required: false,
            instructions: None,
            composite_type_refs: None,
            notes: Vec::new(),
        }
    }

    pub fn is_composite(&self) -> bool {
        self.semantic_type.is_composite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NestedTypeKind {
    /// Variant of a matrix field.
    EntryType,
    /// Variant of a block-repeater field.
    BlockType,
}

/// Block types a block type may contain, resolved to typeIds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildFields {
    pub type_ids: Vec<String>,
}

/// One distinct composite variant. At most one per typeId in a registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedTypeDefinition {
    pub type_id: String,
    pub type_name: String,
    pub kind: NestedTypeKind,
    pub handle: String,
    pub fields: Vec<FieldDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_fields: Option<ChildFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockTypeSettings>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}
