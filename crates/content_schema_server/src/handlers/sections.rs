use std::sync::Arc;

use axum::{Extension, Json};
use content_schema_core::{service::SchemaService, types::Section};

use crate::error::AppError;

pub async fn sections(
    Extension(service): Extension<Arc<dyn SchemaService>>,
) -> Result<Json<Vec<Section>>, AppError> {
    Ok(Json(service.sections()?))
}
