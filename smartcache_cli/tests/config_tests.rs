//! Configuration file handling through the public ConfigManager API

use smartcache_cli::config::ConfigManager;
use smartcache_core::ExpiryMode;
use std::fs;
use tempfile::TempDir;

fn create_test_config_manager(temp_dir: &TempDir) -> ConfigManager {
    ConfigManager::with_path(temp_dir.path().join("config.toml"))
}

#[test]
fn test_set_capacity_is_saved_and_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let mut config_manager = create_test_config_manager(&temp_dir);

    config_manager.set("cache.max_size_bytes", "2048").unwrap();

    assert!(temp_dir.path().join("config.toml").exists());
    assert_eq!(config_manager.get("cache.max_size_bytes").unwrap(), "2048");
    assert_eq!(config_manager.load().unwrap().cache.max_size_bytes, 2048);
}

#[test]
fn test_set_expiry_mode() {
    let temp_dir = TempDir::new().unwrap();
    let mut config_manager = create_test_config_manager(&temp_dir);

    config_manager.set("cache.expiry_mode", "eager").unwrap();

    let config = config_manager.load().unwrap();
    assert_eq!(config.cache.expiry_mode, ExpiryMode::Eager);
}

#[test]
fn test_invalid_expiry_mode_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let mut config_manager = create_test_config_manager(&temp_dir);
    config_manager.set("output.default_format", "json").unwrap();
    let before = fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();

    assert!(config_manager.set("cache.expiry_mode", "sometimes").is_err());

    let after = fs::read_to_string(temp_dir.path().join("config.toml")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_multiple_sections_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let mut config_manager = create_test_config_manager(&temp_dir);

    config_manager.set("cache.credits_total", "3000").unwrap();
    config_manager.set("output.color_enabled", "false").unwrap();
    config_manager
        .set("storage.snapshot_path", "/tmp/smartcache.json")
        .unwrap();

    let config = config_manager.load().unwrap();
    assert_eq!(config.cache.credits_total, 3000);
    assert!(!config.output.color_enabled);
    assert_eq!(
        config.storage.snapshot_path.as_deref(),
        Some(std::path::Path::new("/tmp/smartcache.json"))
    );
}

#[test]
fn test_list_includes_maintenance_intervals() {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    let items = config_manager.list().unwrap();

    assert!(
        items
            .iter()
            .any(|(key, value)| key == "cache.maintenance.flush_secs" && value == "5")
    );
    assert!(items.windows(2).all(|pair| pair[0].0 <= pair[1].0));
}

#[test]
fn test_unknown_key_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_manager = create_test_config_manager(&temp_dir);

    let err = config_manager.get("cache.nonexistent").unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_corrupted_config_file_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("config.toml"),
        "this is not [valid toml",
    )
    .unwrap();

    let config_manager = create_test_config_manager(&temp_dir);
    assert!(config_manager.load().is_err());
}
