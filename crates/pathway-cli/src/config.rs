// File: src/config.rs
// Purpose: Route table configuration parsing from routes.toml

use anyhow::{Context, Result};
use pathway_router::{combine_sources, path_and_query, RouteError, RouteRegistry};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Route table configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Handler name → route templates
    #[serde(default)]
    pub handlers: HashMap<String, Vec<String>>,
}

/// Lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RoutingConfig {
    /// Prefix removed from lookup paths before matching (e.g., "/app")
    #[serde(default)]
    pub base_path: Option<String>,
}

impl Config {
    /// Load configuration from a TOML route file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(?path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load and combine several route files, later files extending earlier ones
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        paths.iter().try_fold(Self::default(), |combined, path| {
            Ok(combined.combine(Self::load(path)?))
        })
    }

    /// Handlers of both configs; a base path set in `other` wins
    pub fn combine(self, other: Config) -> Config {
        Config {
            routing: RoutingConfig {
                base_path: other.routing.base_path.or(self.routing.base_path),
            },
            handlers: combine_sources(&self.handlers, &other.handlers),
        }
    }

    /// Builds the route table described by `[handlers]`
    pub fn route_table(&self) -> Result<RouteRegistry<String>, RouteError> {
        RouteRegistry::from_source(&self.handlers)
    }

    /// Turns a location into the path matched against the table
    pub fn lookup_path<'a>(&self, location: &'a str) -> Cow<'a, str> {
        let path = path_and_query(location);
        let base = match self.routing.base_path.as_deref() {
            Some(base) if !base.trim_end_matches('/').is_empty() => base.trim_end_matches('/'),
            _ => return path,
        };

        match path.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with(['/', '?', '#']) => {
                Cow::Owned(rest.to_string())
            }
            _ => path,
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
