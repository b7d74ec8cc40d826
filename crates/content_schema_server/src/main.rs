//! content_schema_server: serves the schema catalog over HTTP.
//!
//! Configuration: see [`content_schema_server::config`].

use std::sync::Arc;

use anyhow::Context;
use content_schema_core::{SchemaService, SchemaServiceImpl, SnapshotHost};
use content_schema_server::config::ServerConfig;
use content_schema_server::router::build_router;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,content_schema_server=debug,content_schema_core=info".into()
            }),
        )
        .init();

    let config = ServerConfig::load()?;

    let host = SnapshotHost::from_file(&config.snapshot_path)
        .with_context(|| format!("failed to load snapshot {}", config.snapshot_path.display()))?;
    tracing::info!(path = %config.snapshot_path.display(), "schema snapshot loaded");

    let service: Arc<dyn SchemaService> =
        Arc::new(SchemaServiceImpl::new(Arc::new(host)).with_max_depth(config.max_depth));

    let app = build_router(service, &config.route_prefix, config.cors_allow_any);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    tracing::info!(
        prefix = %config.route_prefix,
        max_depth = config.max_depth,
        "content_schema_server listening on {}",
        config.bind_addr
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
