//! Configuration Management
//!
//! Optional user defaults for cfginv, read from the platform config directory.

use crate::pipeline::DEFAULT_WORKER_COUNT;
use crate::resource::{
    default_resource_types, filter_by_services, resource_types_for_services, ResourceTypeName,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// AWS region override
    #[serde(default)]
    pub region: Option<String>,
    /// AWS shared-config profile
    #[serde(default)]
    pub profile: Option<String>,
    /// Concurrent workers
    #[serde(default)]
    pub worker_count: Option<usize>,
    /// Resource types to query instead of the built-in catalog
    #[serde(default)]
    pub resource_types: Option<Vec<String>>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cfginv").join("config.json"))
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load `path` if it exists; a broken file is logged and ignored
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring config file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Effective region (CLI > config > AWS default chain)
    pub fn effective_region(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string).or_else(|| self.region.clone())
    }

    /// Effective profile (CLI > config > AWS default chain)
    pub fn effective_profile(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string).or_else(|| self.profile.clone())
    }

    /// Effective worker count (CLI > config > 5)
    pub fn effective_worker_count(&self, cli: Option<usize>) -> usize {
        cli.or(self.worker_count).unwrap_or(DEFAULT_WORKER_COUNT)
    }

    /// Effective resource types.
    ///
    /// An explicit CLI list wins outright. Otherwise the base list is the
    /// config file's list, or the catalog, narrowed by `services` if any.
    pub fn effective_resource_types(
        &self,
        cli: &[String],
        services: &[String],
    ) -> Vec<ResourceTypeName> {
        if !cli.is_empty() {
            return normalize_resource_types(cli);
        }

        let configured = self
            .resource_types
            .as_deref()
            .map(normalize_resource_types)
            .filter(|types| !types.is_empty());

        match (configured, services.is_empty()) {
            (Some(configured), true) => configured,
            (Some(configured), false) => filter_by_services(&configured, services),
            (None, false) => resource_types_for_services(services),
            (None, true) => default_resource_types().to_vec(),
        }
    }
}

/// Trim entries and drop empty ones; order and duplicates are kept
pub fn normalize_resource_types(raw: &[String]) -> Vec<ResourceTypeName> {
    raw.iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
