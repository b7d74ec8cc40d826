//! GET {prefix}/fields?sectionHandle=&typeHandle=&sectionId=
//!
//! Flattened fields of one entry type plus its nested-type registry.

use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use content_schema_core::{
    proto::{FieldsQuery, FieldsResponse},
    service::SchemaService,
};

use crate::error::AppError;

pub async fn fields(
    Extension(service): Extension<Arc<dyn SchemaService>>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<FieldsResponse>, AppError> {
    let resp = service.fields(query)?;
    Ok(Json(resp))
}
