//! Settings store and settings path resolution
//!
//! The settings file is a small TOML document holding the last-used output
//! directory, the preferred target loudness, an optional transcoder path and
//! logging options. A missing or unreadable file never stops the program:
//! compiled defaults are used instead and a warning is logged.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable that overrides the settings file location
pub const SETTINGS_ENV_VAR: &str = "LNORM_SETTINGS";

/// Default integrated loudness target (LUFS)
pub const DEFAULT_TARGET_LUFS: f64 = -19.0;

/// Quietest selectable loudness target (LUFS)
pub const MIN_TARGET_LUFS: f64 = -23.0;

/// Loudest selectable loudness target (LUFS)
pub const MAX_TARGET_LUFS: f64 = -14.0;

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Last-used output directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Last-used integrated loudness target in LUFS
    #[serde(default = "default_target_lufs")]
    pub target_lufs: f64,

    /// Explicit transcoder binary (otherwise bundled copy, then PATH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_output_dir() -> PathBuf {
    CompiledDefaults::for_current_platform().output_dir
}

fn default_target_lufs() -> f64 {
    DEFAULT_TARGET_LUFS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            target_lufs: DEFAULT_TARGET_LUFS,
            ffmpeg_path: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    /// Replace out-of-range values with defaults
    ///
    /// Returns true if anything was changed.
    pub fn sanitize(&mut self) -> bool {
        if is_valid_target_lufs(self.target_lufs) {
            return false;
        }
        warn!(
            "Target loudness {} LUFS outside [{}, {}], using default {}",
            self.target_lufs, MIN_TARGET_LUFS, MAX_TARGET_LUFS, DEFAULT_TARGET_LUFS
        );
        self.target_lufs = DEFAULT_TARGET_LUFS;
        true
    }
}

/// Check a loudness target against the selectable range (inclusive)
pub fn is_valid_target_lufs(value: f64) -> bool {
    value.is_finite() && (MIN_TARGET_LUFS..=MAX_TARGET_LUFS).contains(&value)
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    /// Default output directory (~/Music)
    pub output_dir: PathBuf,
    /// Default settings file location
    pub settings_path: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        let output_dir = dirs::home_dir()
            .map(|home| home.join("Music"))
            .unwrap_or_else(|| PathBuf::from("Music"));

        let settings_path = dirs::config_dir()
            .map(|d| d.join("lnorm").join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"));

        Self {
            output_dir,
            settings_path,
        }
    }
}

/// Settings file location, resolved in priority order:
/// 1. Explicit path (command-line argument)
/// 2. `LNORM_SETTINGS` environment variable
/// 3. OS-dependent compiled default
#[derive(Debug, Clone, Default)]
pub struct SettingsPathResolver {
    explicit: Option<PathBuf>,
}

impl SettingsPathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_explicit(mut self, path: Option<PathBuf>) -> Self {
        self.explicit = path;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.explicit {
            return path.clone();
        }

        if let Ok(path) = std::env::var(SETTINGS_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        CompiledDefaults::for_current_platform().settings_path
    }
}

/// Key-value settings file backed by TOML
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the settings file
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn try_load(&self) -> Result<Option<Settings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", self.path.display(), e)))?;
        let settings = toml::from_str::<Settings>(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", self.path.display(), e)))?;

        Ok(Some(settings))
    }

    /// Load settings, falling back to defaults on any failure
    ///
    /// A missing file is created with the defaults (best-effort).
    pub fn load_or_create(&self) -> Settings {
        match self.try_load() {
            Ok(Some(mut settings)) => {
                debug!("Settings loaded from {}", self.path.display());
                if settings.sanitize() {
                    self.save_best_effort(&settings);
                }
                settings
            }
            Ok(None) => {
                info!(
                    "Settings file {} not found, creating with defaults",
                    self.path.display()
                );
                let settings = Settings::default();
                self.save_best_effort(&settings);
                settings
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Settings::default()
            }
        }
    }

    /// Write settings atomically (temp file + rename)
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content = toml::to_string_pretty(settings)
            .map_err(|e| Error::Config(format!("Serialize settings failed: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!("Settings written to {}", self.path.display());
        Ok(())
    }

    /// Record a new output directory and persist it
    ///
    /// Returns true if the value changed (and was written).
    pub fn set_output_dir(&self, settings: &mut Settings, dir: &Path) -> Result<bool> {
        if settings.output_dir == dir {
            return Ok(false);
        }
        settings.output_dir = dir.to_path_buf();
        self.save(settings)?;
        info!("Output directory set to {}", dir.display());
        Ok(true)
    }

    fn save_best_effort(&self, settings: &Settings) {
        if let Err(e) = self.save(settings) {
            warn!("Settings write to {} failed: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.target_lufs, DEFAULT_TARGET_LUFS);
        assert!(settings.output_dir.ends_with("Music"));
        assert!(settings.ffmpeg_path.is_none());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_target_lufs_range_is_inclusive() {
        assert!(is_valid_target_lufs(-23.0));
        assert!(is_valid_target_lufs(-14.0));
        assert!(is_valid_target_lufs(-19.0));
        assert!(!is_valid_target_lufs(-24.0));
        assert!(!is_valid_target_lufs(-13.0));
        assert!(!is_valid_target_lufs(f64::NAN));
    }

    #[test]
    fn test_sanitize_resets_out_of_range_target() {
        let mut settings = Settings {
            target_lufs: 3.0,
            ..Settings::default()
        };
        assert!(settings.sanitize());
        assert_eq!(settings.target_lufs, DEFAULT_TARGET_LUFS);
        assert!(!settings.sanitize());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings: Settings = toml::from_str("output_dir = \"/srv/out\"").unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("/srv/out"));
        assert_eq!(settings.target_lufs, DEFAULT_TARGET_LUFS);
        assert_eq!(settings.logging, LoggingConfig::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        let resolver = SettingsPathResolver::new()
            .with_explicit(Some(PathBuf::from("/tmp/lnorm-explicit.toml")));
        assert_eq!(resolver.resolve(), PathBuf::from("/tmp/lnorm-explicit.toml"));
    }
}
