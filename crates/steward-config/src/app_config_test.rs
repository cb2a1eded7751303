use std::time::Duration;

use confique::Config;
use steward_logging::LogLevel;
use tempfile::tempdir;
use tracing::Level;

use crate::{AppConfig, ConfigDir, ServiceConfig};

#[derive(Debug, Clone, Default, Config)]
struct TestConfig {
    #[config(default = true)]
    test: bool,
}

#[test]
fn test_initial_load() {
    let config_dir = tempdir().unwrap().keep();

    let config = AppConfig::<TestConfig>::builder(ConfigDir::Custom(config_dir.clone()))
        .build()
        .unwrap();
    assert!(config_dir.join("config.toml").exists());
    assert!(config.snapshot().test);
}

#[test]
fn test_with_config_filename() {
    let config_dir = tempdir().unwrap().keep();
    let config = AppConfig::<TestConfig>::builder(ConfigDir::Custom(config_dir.clone()))
        .with_config_filename("service.toml")
        .build()
        .unwrap();

    assert!(config_dir.join("service.toml").exists());
    assert_eq!(config_dir.join("service.toml"), config.full_path());
}

#[test]
fn test_contents() {
    let config_dir = tempdir().unwrap().keep();
    let config = AppConfig::<TestConfig>::builder(ConfigDir::Custom(config_dir))
        .build()
        .unwrap();

    assert_eq!(
        "# Default value: true\n#test = true",
        config.contents().unwrap().trim()
    );
}

#[test]
fn test_existing_file_kept() {
    let config_dir = tempdir().unwrap().keep();
    std::fs::write(config_dir.join("config.toml"), "test = false").unwrap();
    let config = AppConfig::<TestConfig>::builder(ConfigDir::Custom(config_dir))
        .build()
        .unwrap();

    assert!(!config.snapshot().test);
    config.overwrite_config_file().unwrap();
    assert!(config.read_config().unwrap().test);
}

#[test]
fn test_snapshot() {
    let config_dir = tempdir().unwrap().keep();
    let config = AppConfig::<TestConfig>::builder(ConfigDir::Custom(config_dir.clone()))
        .build()
        .unwrap();

    std::fs::write(config_dir.join("config.toml"), "test = false").unwrap();
    assert!(config.snapshot().test);
    assert!(!config.read_config().unwrap().test);
    assert!(!config.snapshot().test);
}

#[test]
fn test_service_defaults() {
    let config_dir = tempdir().unwrap().keep();
    let config = AppConfig::<ServiceConfig>::builder(ConfigDir::Custom(config_dir))
        .build()
        .unwrap();
    let snapshot = config.snapshot();

    assert_eq!(Duration::from_millis(10000), snapshot.timeouts.initialize());
    assert_eq!(Duration::from_millis(10000), snapshot.timeouts.pause());
    assert_eq!(Duration::from_millis(10000), snapshot.timeouts.stop());
    assert_eq!(LogLevel(Level::INFO), snapshot.logging.log_level);
    let contents = config.contents().unwrap();
    assert!(contents.contains("initialize_ms"));
    assert!(!contents.contains("shutdown_ms"));
}

#[test]
fn test_service_values_from_file() {
    let config_dir = tempdir().unwrap().keep();
    std::fs::write(
        config_dir.join("config.toml"),
        "[timeouts]\npause_ms = 500\n\n[logging]\nlog_level = \"debug\"\n",
    )
    .unwrap();
    let config = AppConfig::<ServiceConfig>::builder(ConfigDir::Custom(config_dir))
        .build()
        .unwrap();
    let snapshot = config.snapshot();

    assert_eq!(Duration::from_millis(500), snapshot.timeouts.pause());
    assert_eq!(Duration::from_millis(10000), snapshot.timeouts.initialize());
    assert_eq!(LogLevel(Level::DEBUG), snapshot.logging.log_level);
}

#[test]
fn test_env_overrides_file() {
    let config_dir = tempdir().unwrap().keep();
    std::fs::write(
        config_dir.join("config.toml"),
        "[timeouts]\nresume_ms = 500\n",
    )
    .unwrap();
    // Only this test reads the resume timeout
    unsafe { std::env::set_var("STEWARD_RESUME_TIMEOUT_MS", "1500") };
    let config = AppConfig::<ServiceConfig>::builder(ConfigDir::Custom(config_dir))
        .build()
        .unwrap();
    unsafe { std::env::remove_var("STEWARD_RESUME_TIMEOUT_MS") };

    assert_eq!(Duration::from_millis(1500), config.snapshot().timeouts.resume());
}

#[test]
fn test_invalid_value() {
    let config_dir = tempdir().unwrap().keep();
    std::fs::write(
        config_dir.join("config.toml"),
        "[logging]\nlog_level = \"loud\"\n",
    )
    .unwrap();
    let result = AppConfig::<ServiceConfig>::builder(ConfigDir::Custom(config_dir)).build();

    assert!(result.is_err());
}
