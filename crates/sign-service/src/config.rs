//! Service configuration

use crate::{Result, ServiceError};
use field_burn::BurnOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_STORAGE_ROOT: &str = "FIELDBURN_STORAGE_ROOT";
pub const ENV_AUDIT_LOG: &str = "FIELDBURN_AUDIT_LOG";
pub const ENV_PUBLIC_PREFIX: &str = "FIELDBURN_PUBLIC_PREFIX";

/// Configuration of a [`crate::SigningService`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    /// Directory holding uploaded originals
    pub storage_root: PathBuf,
    /// Sub-namespace of the store for burn outputs
    pub signed_namespace: String,
    /// URL prefix under which the storage root is served
    pub public_prefix: String,
    /// JSONL audit log file
    pub audit_log: PathBuf,
    /// File name reported when an upload does not name one
    pub default_file_name: String,
    /// Rendering parameters for every burn
    pub burn: BurnOptions,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("uploads"),
            signed_namespace: "signed".to_string(),
            public_prefix: "/uploads".to_string(),
            audit_log: PathBuf::from("uploads/audit.jsonl"),
            default_file_name: "document.pdf".to_string(),
            burn: BurnOptions::default(),
        }
    }
}

impl ServiceConfig {
    /// Parse configuration from JSON; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Read configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from a variable lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(root) = lookup(ENV_STORAGE_ROOT) {
            self.storage_root = PathBuf::from(root);
        }
        if let Some(log) = lookup(ENV_AUDIT_LOG) {
            self.audit_log = PathBuf::from(log);
        }
        if let Some(prefix) = lookup(ENV_PUBLIC_PREFIX) {
            self.public_prefix = prefix;
        }
        self
    }

    /// Public location of a burn output
    pub fn public_location(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_prefix.trim_end_matches('/'),
            self.signed_namespace,
            name
        )
    }
}
