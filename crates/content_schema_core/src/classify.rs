//! Field classification by kind identifier.
//!
//! The host only exposes a field's concrete kind as a class-like name
//! (`craft\fields\PlainText`, `benf\neo\Field`). Classification is a table
//! lookup, first on the full identifier and then on its final path segment,
//! with a lower-cased fallback for anything the table does not know.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::FieldDefinition;

/// Canonical semantic tag of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SemanticType {
    String,
    Text,
    RichText,
    Number,
    Email,
    Url,
    Date,
    Boolean,
    Select,
    MultiSelect,
    Radio,
    Entries,
    Categories,
    Assets,
    Users,
    Tags,
    Table,
    /// Composite: variants are nested entry types.
    Matrix,
    /// Composite: variants are block types with containment rules.
    Neo,
    Unknown,
    /// Fallback tag for kinds outside the table (lower-cased kind name).
    Other(String),
}

impl SemanticType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::RichText => "richtext",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::Radio => "radio",
            Self::Entries => "entries",
            Self::Categories => "categories",
            Self::Assets => "assets",
            Self::Users => "users",
            Self::Tags => "tags",
            Self::Table => "table",
            Self::Matrix => "matrix",
            Self::Neo => "neo",
            Self::Unknown => "unknown",
            Self::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "text" => Self::Text,
            "richtext" => Self::RichText,
            "number" => Self::Number,
            "email" => Self::Email,
            "url" => Self::Url,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            "select" => Self::Select,
            "multiselect" => Self::MultiSelect,
            "radio" => Self::Radio,
            "entries" => Self::Entries,
            "categories" => Self::Categories,
            "assets" => Self::Assets,
            "users" => Self::Users,
            "tags" => Self::Tags,
            "table" => Self::Table,
            "matrix" => Self::Matrix,
            "neo" => Self::Neo,
            "unknown" | "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Matrix | Self::Neo)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SemanticType> for String {
    fn from(t: SemanticType) -> Self {
        t.as_str().to_string()
    }
}

impl From<String> for SemanticType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub semantic_type: SemanticType,
    pub is_composite: bool,
}

impl Classification {
    fn new(semantic_type: SemanticType) -> Self {
        let is_composite = semantic_type.is_composite();
        Self {
            semantic_type,
            is_composite,
        }
    }
}

/// Full kind identifiers whose final segment alone is ambiguous.
const QUALIFIED_KINDS: &[(&str, SemanticType)] = &[
    ("craft\\ckeditor\\Field", SemanticType::RichText),
    ("benf\\neo\\Field", SemanticType::Neo),
];

const SHORT_KINDS: &[(&str, SemanticType)] = &[
    ("PlainText", SemanticType::String),
    ("Textarea", SemanticType::Text),
    ("RichText", SemanticType::RichText),
    // Bare `Field` is the CKEditor field class.
    ("Field", SemanticType::RichText),
    ("Number", SemanticType::Number),
    ("Email", SemanticType::Email),
    ("Url", SemanticType::Url),
    ("Date", SemanticType::Date),
    ("Lightswitch", SemanticType::Boolean),
    ("Dropdown", SemanticType::Select),
    ("Checkboxes", SemanticType::MultiSelect),
    ("MultiSelect", SemanticType::MultiSelect),
    ("RadioButtons", SemanticType::Radio),
    ("Entries", SemanticType::Entries),
    ("Categories", SemanticType::Categories),
    ("Assets", SemanticType::Assets),
    ("Users", SemanticType::Users),
    ("Tags", SemanticType::Tags),
    ("Table", SemanticType::Table),
    ("Matrix", SemanticType::Matrix),
];

/// Maps kind identifiers to semantic tags. Total and side-effect-free.
#[derive(Debug, Clone)]
pub struct FieldClassifier {
    qualified: HashMap<String, SemanticType>,
    short: HashMap<String, SemanticType>,
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self {
            qualified: QUALIFIED_KINDS
                .iter()
                .map(|(k, t)| (k.to_string(), t.clone()))
                .collect(),
            short: SHORT_KINDS
                .iter()
                .map(|(k, t)| (k.to_string(), t.clone()))
                .collect(),
        }
    }
}

impl FieldClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extra kind. A kind containing a namespace separator is
    /// matched on the full identifier, anything else on the final segment.
    pub fn with_kind(mut self, kind: impl Into<String>, semantic_type: SemanticType) -> Self {
        let kind = kind.into();
        if short_name(&kind) == kind {
            self.short.insert(kind, semantic_type);
        } else {
            self.qualified.insert(normalize_qualified(&kind), semantic_type);
        }
        self
    }

    pub fn classify(&self, field: &FieldDefinition) -> Classification {
        self.classify_kind(&field.kind)
    }

    pub fn classify_kind(&self, kind: &str) -> Classification {
        let kind = kind.trim();
        if kind.is_empty() {
            return Classification::new(SemanticType::Unknown);
        }
        if let Some(t) = self.qualified.get(&normalize_qualified(kind)) {
            return Classification::new(t.clone());
        }
        let short = short_name(kind);
        match self.short.get(short) {
            Some(t) => Classification::new(t.clone()),
            None => Classification::new(SemanticType::from_tag(&short.to_lowercase())),
        }
    }
}

/// Final path segment of a kind identifier.
fn short_name(kind: &str) -> &str {
    kind.rsplit(|c: char| c == '\\' || c == '.' || c == ':')
        .find(|s| !s.is_empty())
        .unwrap_or(kind)
}

/// Qualified identifiers compare with `\` separators and no leading separator.
fn normalize_qualified(kind: &str) -> String {
    kind.replace("::", "\\")
        .replace('.', "\\")
        .trim_start_matches('\\')
        .to_string()
}
