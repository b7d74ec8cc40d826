//! GET {prefix}/sites, also served as {prefix}/locales.

use std::sync::Arc;

use axum::{Extension, Json};
use content_schema_core::{service::SchemaService, types::Site};

use crate::error::AppError;

pub async fn sites(
    Extension(service): Extension<Arc<dyn SchemaService>>,
) -> Result<Json<Vec<Site>>, AppError> {
    Ok(Json(service.sites()?))
}
