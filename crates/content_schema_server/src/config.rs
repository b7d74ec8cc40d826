//! Server configuration.
//!
//! Loaded from a YAML file, then overridden by environment variables:
//!   CONTENT_SCHEMA_CONFIG    config file path (default: config/content_schema.yaml)
//!   CONTENT_SCHEMA_BIND_ADDR listen address
//!   CONTENT_SCHEMA_SNAPSHOT  schema snapshot path
//!   CONTENT_SCHEMA_MAX_DEPTH composite nesting ceiling

use std::path::{Path, PathBuf};

use anyhow::Context;
use content_schema_core::flatten::DEFAULT_MAX_DEPTH;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config/content_schema.yaml";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4200";
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/smartcat";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub snapshot_path: PathBuf,
    pub route_prefix: String,
    pub max_depth: usize,
    /// Allow any origin. The endpoints are anonymous and read-only.
    pub cors_allow_any: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            snapshot_path: PathBuf::from("config/schema_snapshot.yaml"),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            cors_allow_any: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// File config (or defaults when the file is absent) plus env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path =
            std::env::var("CONTENT_SCHEMA_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            tracing::info!(path = %path, "config file not found, using defaults");
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(addr) = var("CONTENT_SCHEMA_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(path) = var("CONTENT_SCHEMA_SNAPSHOT") {
            self.snapshot_path = PathBuf::from(path);
        }
        if let Some(depth) = var("CONTENT_SCHEMA_MAX_DEPTH") {
            self.max_depth = depth
                .parse()
                .with_context(|| format!("CONTENT_SCHEMA_MAX_DEPTH must be an integer, got {depth:?}"))?;
        }
        Ok(())
    }
}
