//! GET {prefix}/types?sectionHandle=|sectionId=

use std::sync::Arc;

use axum::{extract::Query, Extension, Json};
use content_schema_core::{
    proto::{EntryTypeSummary, TypesQuery},
    service::SchemaService,
};

use crate::error::AppError;

pub async fn types(
    Extension(service): Extension<Arc<dyn SchemaService>>,
    Query(query): Query<TypesQuery>,
) -> Result<Json<Vec<EntryTypeSummary>>, AppError> {
    Ok(Json(service.types(query)?))
}
