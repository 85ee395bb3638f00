//! Growth configuration for contiguous backing arrays.

use super::{collect_errors, parse_env_var, Config, ValidationError};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Capacity used for the first allocation of an empty container.
pub const DEFAULT_MIN_CAPACITY: usize = 4;

/// Sizing limits applied when a backing array has to grow.
///
/// The doubling rule itself is fixed; only the floor used for the first
/// allocation and the ceiling are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthConfig {
    /// Capacity of the first allocation (an empty container never allocates
    /// less than this).
    pub min_capacity: usize,
    /// Hard ceiling on capacity. Growth past it fails with
    /// `CapacityOverflow`.
    pub max_capacity: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
            max_capacity: usize::MAX,
        }
    }
}

impl Config for GrowthConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.min_capacity == 0 {
            errors.push(
                ValidationError::new(
                    "min_capacity",
                    &self.min_capacity.to_string(),
                    "minimum capacity must be greater than 0",
                )
                .with_suggestion("typical values: 4-64"),
            );
        }

        if self.max_capacity < self.min_capacity {
            errors.push(ValidationError::new(
                "max_capacity",
                &self.max_capacity.to_string(),
                "maximum capacity must not be below the minimum capacity",
            ));
        }

        collect_errors("Growth", errors)
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.min_capacity = parse_env_var(
            &format!("{}GROWTH_MIN_CAPACITY", prefix),
            config.min_capacity,
        );
        config.max_capacity = parse_env_var(
            &format!("{}GROWTH_MAX_CAPACITY", prefix),
            config.max_capacity,
        );
        config.validate()?;
        log::debug!("Growth configuration from environment: {:?}", config);
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            min_capacity: 16,
            max_capacity: usize::MAX,
        }
    }

    fn memory_preset() -> Self {
        Self {
            min_capacity: 1,
            max_capacity: usize::MAX,
        }
    }
}
