//! Tests for the configuration system: validation, presets, environment
//! parsing and file persistence.

use super::*;
use crate::error::AllocOptError;
use std::env;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_all_config_defaults() {
    assert!(GrowthConfig::default().validate().is_ok());
    assert!(HashTableConfig::default().validate().is_ok());

    let hash = HashTableConfig::default();
    assert_eq!(hash.load_factor, hash_table::DEFAULT_LOAD_FACTOR);
    assert_eq!(hash.bucket_sizing, BucketSizing::Prime);
    assert!(hash.reuse_free_slots);
    assert_eq!(GrowthConfig::default().min_capacity, 4);
}

#[test]
fn test_all_presets_valid() {
    assert!(GrowthConfig::performance_preset().validate().is_ok());
    assert!(GrowthConfig::memory_preset().validate().is_ok());
    assert!(GrowthConfig::balanced_preset().validate().is_ok());

    assert!(HashTableConfig::performance_preset().validate().is_ok());
    assert!(HashTableConfig::memory_preset().validate().is_ok());
    assert!(HashTableConfig::balanced_preset().validate().is_ok());
}

#[test]
fn test_preset_characteristics() {
    let perf = HashTableConfig::performance_preset();
    let mem = HashTableConfig::memory_preset();
    assert!(perf.load_factor < mem.load_factor);
    assert!(perf.initial_capacity > mem.initial_capacity);
    assert!(perf.growth.min_capacity > mem.growth.min_capacity);
    assert_eq!(HashTableConfig::balanced_preset(), HashTableConfig::default());
}

#[test]
fn test_validation_edge_cases() {
    let mut growth = GrowthConfig::default();
    growth.min_capacity = 0;
    assert!(growth.validate().is_err());

    growth.min_capacity = 10;
    growth.max_capacity = 5;
    let err = growth.validate().unwrap_err();
    assert_eq!(err.category(), "config");
    assert!(err.to_string().contains("max_capacity"));

    let mut hash = HashTableConfig::default();
    for bad in [0.0, -0.5, 1.5, f64::NAN] {
        hash.load_factor = bad;
        assert!(hash.validate().is_err(), "load factor {} accepted", bad);
    }
    hash.load_factor = 1.0;
    assert!(hash.validate().is_ok());

    hash.growth.max_capacity = 8;
    hash.initial_capacity = 16;
    assert!(hash.validate().is_err());
}

#[test]
fn test_multiple_validation_errors_are_joined() {
    let config = GrowthConfig {
        min_capacity: 0,
        max_capacity: 0,
    };
    // min == max == 0 only trips the minimum check
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("min_capacity"));
    assert!(!err.to_string().contains(';'));

    let mut hash = HashTableConfig::default();
    hash.load_factor = 2.0;
    hash.growth.max_capacity = 1;
    hash.initial_capacity = 2;
    let msg = hash.validate().unwrap_err().to_string();
    assert!(msg.contains("load_factor"));
    assert!(msg.contains("initial_capacity"));
}

#[test]
fn test_bucket_sizing_parse() {
    assert_eq!("prime".parse::<BucketSizing>().unwrap(), BucketSizing::Prime);
    assert_eq!(
        "Power_Of_Two".parse::<BucketSizing>().unwrap(),
        BucketSizing::PowerOfTwo
    );
    assert_eq!("pow2".parse::<BucketSizing>().unwrap(), BucketSizing::PowerOfTwo);
    assert!(matches!(
        "fibonacci".parse::<BucketSizing>(),
        Err(AllocOptError::Configuration { .. })
    ));
    assert_eq!(BucketSizing::PowerOfTwo.to_string(), "power_of_two");
}

#[test]
fn test_environment_variable_parsing() {
    env::set_var("CFGTEST_ENV_GROWTH_MIN_CAPACITY", "32");
    env::set_var("CFGTEST_ENV_HASH_LOAD_FACTOR", "0.5");
    env::set_var("CFGTEST_ENV_HASH_BUCKET_SIZING", "power_of_two");
    env::set_var("CFGTEST_ENV_HASH_INITIAL_CAPACITY", "not-a-number");
    env::set_var("CFGTEST_ENV_HASH_REUSE_FREE_SLOTS", "off");

    let config = HashTableConfig::from_env_with_prefix("CFGTEST_ENV_").unwrap();
    assert_eq!(config.growth.min_capacity, 32);
    assert_eq!(config.load_factor, 0.5);
    assert_eq!(config.bucket_sizing, BucketSizing::PowerOfTwo);
    // unparsable values keep the default
    assert_eq!(config.initial_capacity, 0);
    assert!(!config.reuse_free_slots);

    env::remove_var("CFGTEST_ENV_GROWTH_MIN_CAPACITY");
    env::remove_var("CFGTEST_ENV_HASH_LOAD_FACTOR");
    env::remove_var("CFGTEST_ENV_HASH_BUCKET_SIZING");
    env::remove_var("CFGTEST_ENV_HASH_INITIAL_CAPACITY");
    env::remove_var("CFGTEST_ENV_HASH_REUSE_FREE_SLOTS");
}

#[test]
fn test_environment_invalid_values_rejected() {
    env::set_var("CFGTEST_BAD_HASH_LOAD_FACTOR", "3.0");
    let result = HashTableConfig::from_env_with_prefix("CFGTEST_BAD_");
    assert!(matches!(result, Err(AllocOptError::Configuration { .. })));
    env::remove_var("CFGTEST_BAD_HASH_LOAD_FACTOR");
}

#[test]
fn test_environment_boolean_parsing() {
    let cases = [
        ("true", true),
        ("TRUE", true),
        ("1", true),
        ("yes", true),
        ("on", true),
        ("false", false),
        ("0", false),
        ("nope", false),
    ];

    for (value, expected) in cases {
        env::set_var("CFGTEST_BOOL_VALUE", value);
        assert_eq!(parse_env_bool("CFGTEST_BOOL_VALUE", !expected), expected);
    }
    env::remove_var("CFGTEST_BOOL_VALUE");

    assert!(parse_env_bool("CFGTEST_BOOL_UNSET", true));
    assert_eq!(parse_env_var("CFGTEST_NUM_UNSET", 7usize), 7);
}

#[test]
fn test_file_serialization() -> Result<()> {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hash_table.json");

    let original = HashTableConfig::performance_preset();
    original.save_to_file(&path)?;

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("\"bucket_sizing\": \"power_of_two\""));

    let loaded = HashTableConfig::load_from_file(&path)?;
    assert_eq!(loaded, original);

    let growth_path = dir.path().join("growth.json");
    GrowthConfig::memory_preset().save_to_file(&growth_path)?;
    assert_eq!(
        GrowthConfig::load_from_file(&growth_path)?,
        GrowthConfig::memory_preset()
    );
    Ok(())
}

#[test]
fn test_load_rejects_invalid_files() {
    let dir = tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(GrowthConfig::load_from_file(&missing).is_err());

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "{ not json").unwrap();
    assert!(GrowthConfig::load_from_file(&garbage).is_err());

    let invalid = dir.path().join("invalid.json");
    fs::write(&invalid, r#"{"min_capacity": 0, "max_capacity": 10}"#).unwrap();
    let err = GrowthConfig::load_from_file(&invalid).unwrap_err();
    assert!(err.to_string().contains("min_capacity"));
}

#[test]
fn test_validation_error_display() {
    let err = ValidationError::new("load_factor", "2", "too large").with_suggestion("0.5-0.9");
    let text = err.to_string();
    assert!(text.contains("load_factor"));
    assert!(text.contains("too large"));
    assert!(text.contains("Suggested values: 0.5-0.9"));
}
