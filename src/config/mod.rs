//! Configuration APIs for allocopt
//!
//! Containers run with sensible defaults, but the sizing rules that decide
//! when and how far a backing array grows are exposed as plain configuration
//! values so applications can tune them per workload.
//!
//! # Configuration Types
//!
//! - [`GrowthConfig`]: minimum and maximum capacity fed into
//!   [`GrowthPolicy`](crate::containers::GrowthPolicy)
//! - [`HashTableConfig`]: initial capacity, load factor and bucket sizing for
//!   [`HashTable`](crate::hash_map::HashTable) and its facades
//!
//! # Preset Configurations
//!
//! ```rust
//! use allocopt::config::{Config, HashTableConfig};
//!
//! let fast = HashTableConfig::performance_preset();
//! let small = HashTableConfig::memory_preset();
//! assert!(fast.load_factor < small.load_factor);
//! ```
//!
//! # Environment Initialization
//!
//! ```rust
//! use allocopt::config::{Config, GrowthConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads ALLOCOPT_GROWTH_MIN_CAPACITY / ALLOCOPT_GROWTH_MAX_CAPACITY
//! let config = GrowthConfig::from_env()?;
//! assert!(config.validate().is_ok());
//! # Ok(())
//! # }
//! ```

use crate::error::{AllocOptError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::fmt;
use std::path::Path;

pub mod growth;
pub mod hash_table;

#[cfg(test)]
mod tests;

pub use growth::GrowthConfig;
pub use hash_table::{BucketSizing, HashTableConfig};

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "ALLOCOPT_";

/// Common configuration trait providing validation, environment initialization,
/// presets and JSON persistence.
pub trait Config: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables with the
    /// `ALLOCOPT_` prefix.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    ///
    /// Unset or unparsable variables keep their default value; the result is
    /// validated before it is returned.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset that trades memory for fewer reallocations and shorter chains.
    fn performance_preset() -> Self;

    /// Preset that keeps backing arrays as small as possible.
    fn memory_preset() -> Self;

    /// Balanced preset, identical to the defaults.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a file as pretty-printed JSON.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self).map_err(|e| {
            AllocOptError::configuration(format!("Failed to serialize config: {}", e))
        })?;
        std::fs::write(path, serialized).map_err(|e| {
            AllocOptError::configuration(format!("Failed to write config file: {}", e))
        })?;
        Ok(())
    }

    /// Load and validate a configuration previously written by
    /// [`save_to_file`](Config::save_to_file).
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AllocOptError::configuration(format!("Failed to read config file: {}", e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            AllocOptError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        log::debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

/// Configuration validation error details.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// The invalid value
    pub value: String,
    /// Description of why the value is invalid
    pub reason: String,
    /// Suggested valid values or ranges
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &str, value: &str, reason: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
            suggestion: None,
        }
    }

    /// Add a suggestion for valid values.
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid configuration for field '{}': value '{}' is invalid ({})",
            self.field, self.value, self.reason
        )?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". Suggested values: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Fold collected validation errors into a single configuration error.
pub(crate) fn collect_errors(component: &str, errors: Vec<ValidationError>) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    Err(AllocOptError::configuration(format!(
        "{} configuration validation failed: {}",
        component,
        errors
            .into_iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    )))
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}
