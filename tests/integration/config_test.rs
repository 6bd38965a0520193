//! Integration tests for configuration persistence.

use tempfile::TempDir;

use trainspec::config::{load_config_from, save_config_to, ConfigError, EngineConfig};
use trainspec::units::{Pace, PaceBasis, Units};
use trainspec::workouts::facts::NormalizeContext;

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = EngineConfig::default();
    config.units = Units::Imperial;
    config.tolerance.quality = 0.05;
    config.tolerance.easy = 0.08;
    config.athlete.ftp_watts = Some(265.0);
    config.athlete.threshold_pace = Some(Pace::new(420.0, PaceBasis::PerMile));

    save_config_to(&config, &path).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded.units, Units::Imperial);
    assert_eq!(loaded.tolerance, config.tolerance);
    assert_eq!(loaded.athlete, config.athlete);

    let ctx = NormalizeContext::from_config(&loaded);
    assert_eq!(ctx.units, Units::Imperial);
    assert_eq!(ctx.baseline.valid_ftp(), Some(265.0));
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    std::fs::write(&path, "version = \"0.2.0\"\n[tolerance]\nquality = 0.9\neasy = 0.9\n").unwrap();
    assert!(matches!(load_config_from(&path), Err(ConfigError::InvalidValue(_))));

    std::fs::write(&path, "this is = = not toml").unwrap();
    assert!(matches!(load_config_from(&path), Err(ConfigError::ParseError(_))));
}

#[test]
fn test_invalid_config_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = EngineConfig::default();
    config.tolerance.easy = 0.01;
    assert!(save_config_to(&config, &path).is_err());
    assert!(!path.exists());
}
