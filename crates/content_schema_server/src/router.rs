//! Router construction for the content schema server.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use content_schema_core::service::SchemaService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;

/// Build the full axum router. Catalog routes live under `prefix`;
/// `/health` is always at the root.
pub fn build_router(service: Arc<dyn SchemaService>, prefix: &str, cors_allow_any: bool) -> Router {
    let api = Router::new()
        .route("/fields", get(handlers::fields::fields))
        .route("/sections", get(handlers::sections::sections))
        .route("/types", get(handlers::types::types))
        .route("/sites", get(handlers::sites::sites))
        .route("/locales", get(handlers::sites::sites))
        .route(
            "/entities/:kind/fields",
            get(handlers::entities::entity_fields),
        );

    let prefix = normalize_prefix(prefix);
    let app = Router::new().route("/health", get(handlers::health::health));
    let app = if prefix.is_empty() {
        app.merge(api)
    } else {
        app.nest(&prefix, api)
    };

    let app = app.layer(Extension(service)).layer(TraceLayer::new_for_http());
    if cors_allow_any {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// `api/smartcat`, `/api/smartcat/` and `/api/smartcat` all nest at
/// `/api/smartcat`. A blank prefix or `/` mounts at the root.
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
