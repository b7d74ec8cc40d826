//! GET {prefix}/entities/:kind/fields
//!
//! Every field of one entity kind across all its containers, followed by
//! the kind's native attributes.

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use content_schema_core::{proto::EntityFieldsResponse, service::SchemaService};

use crate::error::AppError;

pub async fn entity_fields(
    Extension(service): Extension<Arc<dyn SchemaService>>,
    Path(kind): Path<String>,
) -> Result<Json<EntityFieldsResponse>, AppError> {
    Ok(Json(service.entity_fields(&kind)?))
}
