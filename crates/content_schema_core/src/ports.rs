//! Port trait for the content-management host.
//! Core logic depends only on this trait; the server wires in a concrete host.

use thiserror::Error;

use crate::types::*;

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Failures raised by a host lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("inconsistent host data: {0}")]
    Inconsistent(String),

    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the host's schema storage.
///
/// Every call is a discrete synchronous lookup. Implementations are shared
/// across requests behind an `Arc` and must not hold per-request state.
pub trait ContentHost: Send + Sync {
    fn sites(&self) -> HostResult<Vec<Site>>;

    fn sections(&self) -> HostResult<Vec<Section>>;

    fn section_by_handle(&self, handle: &str) -> HostResult<Option<Section>>;

    fn section_by_id(&self, id: i64) -> HostResult<Option<Section>>;

    /// Entry types of a section, in the section's declared order.
    fn entry_types(&self, section: &Section) -> HostResult<Vec<EntryType>>;

    fn entry_type_fields(&self, entry_type: &EntryType) -> HostResult<FieldSet>;

    /// Entry types a matrix field may contain. Empty for any other field.
    fn matrix_entry_types(&self, field: &FieldDefinition) -> HostResult<Vec<EntryType>>;

    /// Block types of a block-repeater field. Empty for any other field.
    fn block_types(&self, field: &FieldDefinition) -> HostResult<Vec<BlockType>>;

    fn block_type_fields(&self, block_type: &BlockType) -> HostResult<FieldSet>;

    fn containers(&self, kind: ContainerKind) -> HostResult<Vec<FieldContainer>>;

    fn container_fields(&self, container: &FieldContainer) -> HostResult<FieldSet>;

    /// The single user field layout.
    fn user_fields(&self) -> HostResult<FieldSet>;
}
