//! Hash table configuration.

use super::{collect_errors, parse_env_bool, parse_env_var, Config, GrowthConfig, ValidationError};
use crate::error::{AllocOptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default ratio of live entries to buckets that triggers a rehash.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// How the bucket array is sized on rehash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BucketSizing {
    /// Smallest prime from the internal table not below the request.
    /// Spreads poorly mixed hashes, costs a modulo per lookup.
    #[default]
    Prime,
    /// Next power of two; bucket index is a mask of the hash.
    PowerOfTwo,
}

impl fmt::Display for BucketSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketSizing::Prime => f.write_str("prime"),
            BucketSizing::PowerOfTwo => f.write_str("power_of_two"),
        }
    }
}

impl FromStr for BucketSizing {
    type Err = AllocOptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prime" => Ok(BucketSizing::Prime),
            "power_of_two" | "pow2" => Ok(BucketSizing::PowerOfTwo),
            other => Err(AllocOptError::configuration(format!(
                "unknown bucket sizing '{}', expected 'prime' or 'power_of_two'",
                other
            ))),
        }
    }
}

/// Sizing parameters for [`HashTable`](crate::hash_map::HashTable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashTableConfig {
    /// Entries reserved up front.
    pub initial_capacity: usize,
    /// Rehash once `live / buckets` would exceed this value. Must lie in `(0, 1]`.
    pub load_factor: f64,
    /// Bucket count strategy.
    pub bucket_sizing: BucketSizing,
    /// Recycle freed entry slots on insert. When disabled, removed slots stay
    /// vacant until `trim_excess` and enumeration follows insertion order.
    pub reuse_free_slots: bool,
    /// Growth of the entry array.
    pub growth: GrowthConfig,
}

impl Default for HashTableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
            bucket_sizing: BucketSizing::Prime,
            reuse_free_slots: true,
            growth: GrowthConfig::default(),
        }
    }
}

impl HashTableConfig {
    /// Default configuration with a reserved capacity.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }
}

impl Config for HashTableConfig {
    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            errors.push(
                ValidationError::new(
                    "load_factor",
                    &self.load_factor.to_string(),
                    "load factor must be in (0, 1]",
                )
                .with_suggestion("0.5-0.9"),
            );
        }

        if self.initial_capacity > self.growth.max_capacity {
            errors.push(ValidationError::new(
                "initial_capacity",
                &self.initial_capacity.to_string(),
                "initial capacity exceeds growth.max_capacity",
            ));
        }

        collect_errors("Hash table", errors)?;
        self.growth.validate()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self> {
        let mut config = Self::default();
        config.growth = GrowthConfig::from_env_with_prefix(prefix)?;
        config.initial_capacity = parse_env_var(
            &format!("{}HASH_INITIAL_CAPACITY", prefix),
            config.initial_capacity,
        );
        config.load_factor =
            parse_env_var(&format!("{}HASH_LOAD_FACTOR", prefix), config.load_factor);
        config.bucket_sizing = parse_env_var(
            &format!("{}HASH_BUCKET_SIZING", prefix),
            config.bucket_sizing,
        );
        config.reuse_free_slots = parse_env_bool(
            &format!("{}HASH_REUSE_FREE_SLOTS", prefix),
            config.reuse_free_slots,
        );
        config.validate()?;
        log::debug!("Hash table configuration from environment: {:?}", config);
        Ok(config)
    }

    fn performance_preset() -> Self {
        Self {
            initial_capacity: 64,
            load_factor: 0.5,
            bucket_sizing: BucketSizing::PowerOfTwo,
            reuse_free_slots: true,
            growth: GrowthConfig::performance_preset(),
        }
    }

    fn memory_preset() -> Self {
        Self {
            initial_capacity: 0,
            load_factor: 1.0,
            bucket_sizing: BucketSizing::Prime,
            reuse_free_slots: true,
            growth: GrowthConfig::memory_preset(),
        }
    }
}
