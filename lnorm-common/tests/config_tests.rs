//! Settings store and settings path resolution tests
//!
//! Tests that manipulate LNORM_SETTINGS are marked with #[serial] so they run
//! sequentially, not in parallel.

use lnorm_common::config::{
    CompiledDefaults, LoggingConfig, Settings, SettingsPathResolver, SettingsStore,
    DEFAULT_TARGET_LUFS, SETTINGS_ENV_VAR,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(SETTINGS_ENV_VAR);

    let resolved = SettingsPathResolver::new().resolve();
    assert_eq!(resolved, CompiledDefaults::for_current_platform().settings_path);
    assert!(resolved.ends_with("settings.toml"));
}

#[test]
#[serial]
fn test_resolver_env_var() {
    env::set_var(SETTINGS_ENV_VAR, "/tmp/lnorm-env-settings.toml");

    let resolved = SettingsPathResolver::new().resolve();
    assert_eq!(resolved, PathBuf::from("/tmp/lnorm-env-settings.toml"));

    env::remove_var(SETTINGS_ENV_VAR);
}

#[test]
#[serial]
fn test_resolver_explicit_beats_env_var() {
    env::set_var(SETTINGS_ENV_VAR, "/tmp/lnorm-env-settings.toml");

    let resolved = SettingsPathResolver::new()
        .with_explicit(Some(PathBuf::from("/tmp/lnorm-cli-settings.toml")))
        .resolve();
    assert_eq!(resolved, PathBuf::from("/tmp/lnorm-cli-settings.toml"));

    env::remove_var(SETTINGS_ENV_VAR);
}

#[test]
fn test_missing_file_is_created_with_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("settings.toml");
    let store = SettingsStore::new(&path);

    let settings = store.load_or_create();

    assert_eq!(settings, Settings::default());
    assert!(path.exists(), "defaults should be written on first load");
    assert_eq!(store.try_load().unwrap(), Some(Settings::default()));
}

#[test]
fn test_try_load_missing_file_is_none() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::new(temp.path().join("absent.toml"));
    assert!(store.try_load().unwrap().is_none());
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.toml");
    std::fs::write(&path, "output_dir = [this is not toml").unwrap();
    let store = SettingsStore::new(&path);

    assert!(store.try_load().is_err());
    let settings = store.load_or_create();
    assert_eq!(settings, Settings::default());

    // Corrupt file is left alone for the user to inspect
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("this is not toml"));
}

#[test]
fn test_save_then_load_preserves_values() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::new(temp.path().join("settings.toml"));

    let settings = Settings {
        output_dir: PathBuf::from("/srv/normalized"),
        target_lufs: -16.0,
        ffmpeg_path: Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg")),
        logging: LoggingConfig {
            level: "debug".to_string(),
            file: Some(PathBuf::from("/var/log/lnorm.log")),
        },
    };
    store.save(&settings).unwrap();

    assert_eq!(store.try_load().unwrap(), Some(settings));
    assert!(!temp.path().join("settings.toml.tmp").exists());
}

#[test]
fn test_out_of_range_target_is_reset_on_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.toml");
    std::fs::write(&path, "output_dir = \"/srv/out\"\ntarget_lufs = -40.0\n").unwrap();
    let store = SettingsStore::new(&path);

    let settings = store.load_or_create();
    assert_eq!(settings.output_dir, PathBuf::from("/srv/out"));
    assert_eq!(settings.target_lufs, DEFAULT_TARGET_LUFS);

    let persisted = store.try_load().unwrap().unwrap();
    assert_eq!(persisted.target_lufs, DEFAULT_TARGET_LUFS);
}

#[test]
fn test_set_output_dir_persists_only_on_change() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.toml");
    let store = SettingsStore::new(&path);
    let mut settings = Settings::default();

    let new_dir = temp.path().join("out");
    assert!(store.set_output_dir(&mut settings, &new_dir).unwrap());
    assert_eq!(settings.output_dir, new_dir);
    assert_eq!(store.try_load().unwrap().unwrap().output_dir, new_dir);

    std::fs::remove_file(&path).unwrap();
    assert!(!store.set_output_dir(&mut settings, &new_dir).unwrap());
    assert!(!path.exists(), "unchanged directory should not rewrite the file");
}
