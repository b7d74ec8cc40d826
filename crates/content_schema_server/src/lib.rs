//! content_schema_server: read-only REST surface over the schema catalog.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
