//! # Route Table Configuration
//!
//! Route tables can be described in a file instead of code. The format is
//! picked from the extension: `.yaml`/`.yml` for YAML, `.toml` for TOML and
//! JSON for everything else.
//!
//! ```yaml
//! case_sensitive: true        # optional, overrides BRRTM_CASE_SENSITIVE
//! routes:
//!   - method: GET
//!     path: /users/:id:int
//!     id: get_user
//!   - method: GET
//!     host: api.example.com   # optional, omitted means any host
//!     path: /health
//!     id: api_health
//! ```
//!
//! Route identifiers are strings. Routes are registered in file order and the
//! first registration error aborts the load, naming the offending entry.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::router::{Router, RouterBuilder, RouterOptions};
use crate::runtime_config::RuntimeConfig;

/// One route entry of a table file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    pub path: String,
    pub id: String,
}

/// Parsed route table file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTableConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_sensitive: Option<bool>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

/// Serialization format of a route table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Yaml,
    Json,
    Toml,
}

impl TableFormat {
    /// Pick the format from the file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => TableFormat::Yaml,
            Some("toml") => TableFormat::Toml,
            _ => TableFormat::Json,
        }
    }
}

/// Parse route table text
///
/// # Errors
///
/// Returns an error when the text is not valid for `format` or does not have
/// the route table shape.
pub fn parse_route_table(content: &str, format: TableFormat) -> Result<RouteTableConfig> {
    let config = match format {
        TableFormat::Yaml => serde_yaml::from_str(content).context("invalid YAML route table")?,
        TableFormat::Json => serde_json::from_str(content).context("invalid JSON route table")?,
        TableFormat::Toml => toml::from_str(content).context("invalid TOML route table")?,
    };
    Ok(config)
}

/// Read and parse a route table file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_route_table<P: AsRef<Path>>(path: P) -> Result<RouteTableConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    parse_route_table(&content, TableFormat::from_path(path))
        .with_context(|| format!("failed to parse route table {}", path.display()))
}

impl RouteTableConfig {
    /// Options for the builder: runtime defaults, with `case_sensitive`
    /// overridden by the file when present
    #[must_use]
    pub fn router_options(&self, runtime: &RuntimeConfig) -> RouterOptions {
        let mut options = RouterOptions::from(runtime);
        if let Some(case_sensitive) = self.case_sensitive {
            options.case_sensitive = case_sensitive;
        }
        options
    }

    /// Register every entry and seal the router
    ///
    /// # Errors
    ///
    /// Returns the first registration error, with the entry's position,
    /// method and path attached.
    pub fn build_router(&self, runtime: &RuntimeConfig) -> Result<Router<String>> {
        let mut builder = RouterBuilder::with_options(self.router_options(runtime));
        for (index, entry) in self.routes.iter().enumerate() {
            builder
                .register(
                    &entry.method,
                    entry.host.as_deref(),
                    &entry.path,
                    entry.id.clone(),
                )
                .with_context(|| {
                    format!(
                        "route #{} ({} {}) with id '{}' rejected",
                        index + 1,
                        entry.method,
                        entry.path,
                        entry.id
                    )
                })?;
        }
        Ok(builder.seal())
    }
}

/// Load a route table file and build a sealed router from it
///
/// # Errors
///
/// Fails if the file cannot be loaded or any route is rejected; no partial
/// router is returned.
pub fn load_router<P: AsRef<Path>>(path: P, runtime: &RuntimeConfig) -> Result<Router<String>> {
    let path = path.as_ref();
    let config = load_route_table(path)?;
    let router = config
        .build_router(runtime)
        .with_context(|| format!("failed to build router from {}", path.display()))?;
    info!(
        table = %path.display(),
        routes_count = router.len(),
        "Route table loaded"
    );
    Ok(router)
}
