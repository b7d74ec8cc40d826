//! Host-side schema types.
//! Pure values handed out by a `ContentHost`; the catalog never mutates them.

use serde::{Deserialize, Serialize};

// ── Sites & sections ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub has_urls: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Single,
    Channel,
    Structure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub handle: String,
    pub name: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
}

// ── Entry types ──────────────────────────────────────────────

/// How an entry type presents its native title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleConfig {
    #[serde(default)]
    pub has_title_field: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub translation_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryType {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub title: TitleConfig,
}

// ── Fields ───────────────────────────────────────────────────

/// A custom field definition as stored by the host.
///
/// `kind` is the host's class-like identifier (`craft\fields\PlainText`).
/// `translation_method` is the raw configured value; interpretation lives in
/// [`crate::localization`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefinition {
    pub id: Option<i64>,
    pub handle: String,
    pub name: String,
    pub kind: String,
    pub translation_method: Option<String>,
    pub required: bool,
    pub instructions: Option<String>,
}

/// One slot of a field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutElement {
    /// The container's native title. Not a stored field.
    Title,
    Custom(FieldDefinition),
}

/// Ordered field layout of a container or composite variant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSet {
    pub elements: Vec<LayoutElement>,
}

impl FieldSet {
    pub fn new(elements: Vec<LayoutElement>) -> Self {
        Self { elements }
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutElement> {
        self.elements.iter()
    }

    pub fn custom_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.elements.iter().filter_map(|e| match e {
            LayoutElement::Custom(f) => Some(f),
            LayoutElement::Title => None,
        })
    }

    /// Same layout with the native title removed.
    pub fn without_title(&self) -> Self {
        Self {
            elements: self
                .elements
                .iter()
                .filter(|e| !matches!(e, LayoutElement::Title))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ── Block-repeater block types ───────────────────────────────

/// Which block types may be nested inside a block type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChildBlocks {
    All,
    #[default]
    None,
    Only(Vec<String>),
}

impl Serialize for ChildBlocks {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("all"),
            Self::None => serializer.serialize_str("none"),
            Self::Only(handles) => handles.serialize(serializer),
        }
    }
}

/// Block type settings carried verbatim into the nested type registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTypeSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub min_blocks: Option<u32>,
    pub max_blocks: Option<u32>,
    pub min_child_blocks: Option<u32>,
    pub max_child_blocks: Option<u32>,
    pub min_sibling_blocks: Option<u32>,
    pub max_sibling_blocks: Option<u32>,
    pub top_level: bool,
    pub child_blocks: ChildBlocks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockType {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub settings: BlockTypeSettings,
}

// ── Other field containers ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerKind {
    CategoryGroup,
    Volume,
    GlobalSet,
}

/// Category group, asset volume or global set: a container owning one layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldContainer {
    pub id: i64,
    pub handle: String,
    pub name: String,
    pub kind: ContainerKind,
}
