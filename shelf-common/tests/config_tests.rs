//! Tests for configuration loading and root folder resolution
//!
//! Tests that touch SHELF_ROOT_FOLDER are marked #[serial] so they never run
//! in parallel with each other.

use serial_test::serial;
use shelf_common::config::{
    CompiledDefaults, RootFolderInitializer, RootFolderResolver, TomlConfig,
    DEFAULT_CATALOG_BASE_URL, ROOT_FOLDER_ENV,
};
use std::env;
use std::path::PathBuf;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();
    assert!(!defaults.root_folder.as_os_str().is_empty());
    assert_eq!(defaults.log_level, "info");
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let root = RootFolderResolver::new().resolve();
    assert_eq!(root, CompiledDefaults::for_current_platform().root_folder);
}

#[test]
#[serial]
fn test_resolver_env_var_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/shelf-env-root");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/shelf-toml-root")),
        ..Default::default()
    };
    let root = RootFolderResolver::new().with_toml_config(&config).resolve();
    assert_eq!(root, PathBuf::from("/tmp/shelf-env-root"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_cli_arg_beats_env() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/shelf-env-root");

    let root = RootFolderResolver::new()
        .with_cli_arg(Some(PathBuf::from("/tmp/shelf-cli-root")))
        .resolve();
    assert_eq!(root, PathBuf::from("/tmp/shelf-cli-root"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_uses_toml_when_env_missing() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/shelf-toml-root")),
        ..Default::default()
    };
    let root = RootFolderResolver::new().with_toml_config(&config).resolve();
    assert_eq!(root, PathBuf::from("/tmp/shelf-toml-root"));
}

#[test]
fn test_toml_parsing_with_partial_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf-scan.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/books"

[catalog]
timeout_secs = 3
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/books")));
    assert_eq!(config.catalog.timeout_secs, 3);
    assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_BASE_URL);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_toml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "root_folder = [unterminated").unwrap();

    assert!(TomlConfig::load(&path).is_err());

    let config = TomlConfig::load_or_default(Some(&path));
    assert!(config.root_folder.is_none());
    assert_eq!(config.catalog.base_url, DEFAULT_CATALOG_BASE_URL);
}

#[test]
fn test_missing_toml_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TomlConfig::load_or_default(Some(&dir.path().join("absent.toml")));
    assert!(config.root_folder.is_none());
    assert_eq!(config.catalog.timeout_secs, 15);
}

#[test]
fn test_initializer_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("shelf-root");

    let initializer = RootFolderInitializer::new(root.clone());
    initializer.ensure_directory_exists().unwrap();

    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("shelf.db"));
}
