//! Entity kinds and the native fields each kind carries outside its layouts.

use std::fmt;
use std::str::FromStr;

use crate::classify::SemanticType;
use crate::descriptor::FieldDescriptor;
use crate::error::SchemaError;
use crate::types::ContainerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Entries,
    Categories,
    Assets,
    Users,
    Globals,
}

impl FromStr for EntityKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entry" | "entries" => Ok(Self::Entries),
            "category" | "categories" => Ok(Self::Categories),
            "asset" | "assets" => Ok(Self::Assets),
            "user" | "users" => Ok(Self::Users),
            "globalset" | "globals" => Ok(Self::Globals),
            _ => Err(SchemaError::InvalidInput(format!(
                "Unsupported entity type: {s}"
            ))),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entries => "entries",
            Self::Categories => "categories",
            Self::Assets => "assets",
            Self::Users => "users",
            Self::Globals => "globals",
        }
    }

    /// Host container kind holding this entity's layouts. Entries live in
    /// sections and users have a single layout, so neither has one.
    pub fn container_kind(self) -> Option<ContainerKind> {
        match self {
            Self::Categories => Some(ContainerKind::CategoryGroup),
            Self::Assets => Some(ContainerKind::Volume),
            Self::Globals => Some(ContainerKind::GlobalSet),
            Self::Entries | Self::Users => None,
        }
    }

    /// Attributes every element of this kind has regardless of layout.
    pub fn native_fields(self) -> Vec<FieldDescriptor> {
        use SemanticType as T;
        let f = FieldDescriptor::native;
        match self {
            Self::Entries => vec![
                f("title", "Title", T::String, true),
                f("slug", "Slug", T::String, true),
                f("postDate", "Post Date", T::Date, false),
                f("expiryDate", "Expiry Date", T::Date, false),
            ],
            Self::Categories => vec![
                f("title", "Title", T::String, true),
                f("slug", "Slug", T::String, true),
            ],
            Self::Assets => vec![
                f("title", "Title", T::String, true),
                f("filename", "Filename", T::String, false),
                f("kind", "File Kind", T::String, false),
                f("size", "File Size", T::Number, false),
                f("width", "Width", T::Number, false),
                f("height", "Height", T::Number, false),
            ],
            Self::Users => vec![
                f("username", "Username", T::String, false),
                f("firstName", "First Name", T::String, false),
                f("lastName", "Last Name", T::String, false),
                f("fullName", "Full Name", T::String, false),
                f("email", "Email", T::Email, false),
            ],
            Self::Globals => vec![],
        }
    }
}
