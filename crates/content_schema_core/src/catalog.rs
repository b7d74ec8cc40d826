//! Container lookup: the boundary between request parameters and the host.

use crate::error::SchemaError;
use crate::ports::ContentHost;
use crate::types::{EntryType, FieldSet, Section};

/// How a request identifies a section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionSelector {
    Handle(String),
    Id(i64),
    /// Both given; they must name the same section.
    Both { handle: String, id: i64 },
}

impl SectionSelector {
    /// `None` when neither part is present.
    pub fn from_parts(handle: Option<String>, id: Option<i64>) -> Option<Self> {
        match (handle, id) {
            (Some(handle), Some(id)) => Some(Self::Both { handle, id }),
            (Some(handle), None) => Some(Self::Handle(handle)),
            (None, Some(id)) => Some(Self::Id(id)),
            (None, None) => None,
        }
    }
}

pub struct ContainerCatalog<'a> {
    host: &'a dyn ContentHost,
}

impl<'a> ContainerCatalog<'a> {
    pub fn new(host: &'a dyn ContentHost) -> Self {
        Self { host }
    }

    /// Resolve a section by handle, cross-checked against `id` when given.
    pub fn resolve_section(&self, handle: &str, id: Option<i64>) -> Result<Section, SchemaError> {
        let selector = match id {
            Some(id) => SectionSelector::Both {
                handle: handle.to_string(),
                id,
            },
            None => SectionSelector::Handle(handle.to_string()),
        };
        self.select_section(&selector)
    }

    pub fn select_section(&self, selector: &SectionSelector) -> Result<Section, SchemaError> {
        match selector {
            SectionSelector::Handle(handle) => self
                .host
                .section_by_handle(handle)?
                .ok_or_else(|| SchemaError::NotFound(format!("Section not found: {handle}"))),
            SectionSelector::Id(id) => self
                .host
                .section_by_id(*id)?
                .ok_or_else(|| SchemaError::NotFound(format!("Section not found: id {id}"))),
            SectionSelector::Both { handle, id } => {
                // Lookup by id; the handle only confirms it.
                let section = self
                    .host
                    .section_by_id(*id)?
                    .ok_or_else(|| SchemaError::NotFound(format!("Section not found: {handle}")))?;
                if section.handle != *handle {
                    tracing::debug!(id, expected = %handle, actual = %section.handle, "section handle mismatch");
                    return Err(SchemaError::Mismatch {
                        id: *id,
                        expected: handle.clone(),
                        actual: section.handle,
                    });
                }
                Ok(section)
            }
        }
    }

    pub fn entry_types(&self, section: &Section) -> Result<Vec<EntryType>, SchemaError> {
        Ok(self.host.entry_types(section)?)
    }

    pub fn entry_type(&self, section: &Section, handle: &str) -> Result<EntryType, SchemaError> {
        self.entry_types(section)?
            .into_iter()
            .find(|et| et.handle == handle)
            .ok_or_else(|| {
                SchemaError::NotFound(format!(
                    "Entry type not found: {handle} in section {}",
                    section.handle
                ))
            })
    }

    pub fn field_set(&self, entry_type: &EntryType) -> Result<FieldSet, SchemaError> {
        Ok(self.host.entry_type_fields(entry_type)?)
    }
}
