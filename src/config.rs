//! StripeFS configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::StripeLayout;

/// Default configuration constants
///
/// This module centralizes all default values used throughout StripeFS.
/// By collecting these constants in one place, we ensure consistency
/// and make it easier to adjust defaults for different deployment scenarios.
pub mod defaults {

    /// Default stripe count: 1 (no striping until configured otherwise)
    pub const DEFAULT_STRIPE_COUNT: u32 = 1;

    /// Default stripe size: 1MB (the classic Lustre default)
    pub const DEFAULT_STRIPE_SIZE: u64 = 1024 * 1024;

    /// Upper bound for stripe size accepted by validation: 128MB
    pub const MAX_STRIPE_SIZE: u64 = 128 * 1024 * 1024;

    /// Default number of object storage targets
    pub const NUM_TARGETS: usize = 4;

    /// Default data directory
    pub const fn default_data_dir() -> &'static str {
        "/tmp/stripefs"
    }

    /// Default log level
    pub const fn default_log_level() -> &'static str {
        "info"
    }

    /// Default target names: ost1..ost4
    pub fn default_target_names() -> Vec<String> {
        (1..=NUM_TARGETS).map(|i| format!("ost{}", i)).collect()
    }

    /// File name of the catalog snapshot inside the data directory
    pub const CATALOG_SNAPSHOT_FILE: &str = "catalog.json";
}

/// StripeFS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeFsConfig {
    /// Node configuration
    pub node: NodeConfig,

    /// Storage configuration
    pub storage: StorageConfig,
}

/// Node configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Node ID (unique identifier)
    pub node_id: String,

    /// Data directory (holds target directories and the catalog snapshot)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(defaults::default_data_dir())
}

fn default_log_level() -> String {
    defaults::default_log_level().to_string()
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Ordered list of target names. The order is the placement order:
    /// stripe `i` of a file with stripe count `c` lands on `targets[i % c]`.
    #[serde(default = "defaults::default_target_names")]
    pub targets: Vec<String>,

    /// Default stripe count applied to the root directory
    #[serde(default = "default_stripe_count")]
    pub default_stripe_count: u32,

    /// Default stripe size in bytes applied to the root directory
    #[serde(default = "default_stripe_size")]
    pub default_stripe_size: u64,
}

fn default_stripe_count() -> u32 {
    defaults::DEFAULT_STRIPE_COUNT
}

fn default_stripe_size() -> u64 {
    defaults::DEFAULT_STRIPE_SIZE
}

impl Default for StripeFsConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig {
                node_id: "mds1".to_string(),
                data_dir: default_data_dir(),
                log_level: default_log_level(),
            },
            storage: StorageConfig {
                targets: defaults::default_target_names(),
                default_stripe_count: default_stripe_count(),
                default_stripe_size: default_stripe_size(),
            },
        }
    }
}

impl StripeFsConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("Failed to read config file: {}", e)))?;

        let config: StripeFsConfig = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializeError(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents)
            .map_err(|e| ConfigError::WriteError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// The default stripe layout applied to the root directory
    pub fn default_layout(&self) -> StripeLayout {
        StripeLayout::new(
            self.storage.default_stripe_count,
            self.storage.default_stripe_size,
        )
    }

    /// Path of the catalog snapshot file
    pub fn catalog_path(&self) -> PathBuf {
        self.node.data_dir.join(defaults::CATALOG_SNAPSHOT_FILE)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate node ID
        if self.node.node_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "Node ID cannot be empty".to_string(),
            ));
        }

        // Validate targets (non-empty, unique names)
        if self.storage.targets.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one target is required".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for name in &self.storage.targets {
            if name.is_empty() || name.contains('/') {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid target name: {:?}",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate target name: {}",
                    name
                )));
            }
        }

        // Validate default stripe count (must be in 1..=targets)
        if self.storage.default_stripe_count == 0
            || self.storage.default_stripe_count as usize > self.storage.targets.len()
        {
            return Err(ConfigError::ValidationError(format!(
                "Default stripe count must be between 1 and {} (number of targets)",
                self.storage.targets.len()
            )));
        }

        // Validate default stripe size (must be > 0 and <= 128MB)
        if self.storage.default_stripe_size == 0
            || self.storage.default_stripe_size > defaults::MAX_STRIPE_SIZE
        {
            return Err(ConfigError::ValidationError(
                "Default stripe size must be between 1 and 128MB".to_string(),
            ));
        }

        // Validate log level
        match self.node.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {}",
                    self.node.log_level
                )));
            }
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Failed to write config: {0}")]
    WriteError(String),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}
