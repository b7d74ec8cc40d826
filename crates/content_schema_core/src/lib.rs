//! content_schema_core: schema introspection over a self-referential
//! content-type graph.
//!
//! Pure domain logic. Talks to the content-management host only through the
//! [`ports::ContentHost`] trait; no HTTP, no I/O beyond snapshot loading.

pub mod catalog;
pub mod classify;
pub mod composite;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod flatten;
pub mod localization;
pub mod ports;
pub mod proto;
pub mod service;
pub mod snapshot;
pub mod types;

pub use classify::{FieldClassifier, SemanticType};
pub use descriptor::{FieldDescriptor, NestedTypeDefinition};
pub use error::SchemaError;
pub use flatten::{FlattenOutput, Flattener, TraversalState};
pub use ports::ContentHost;
pub use service::{SchemaService, SchemaServiceImpl};
pub use snapshot::SnapshotHost;
