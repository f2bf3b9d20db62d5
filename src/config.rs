//! Configuration loading for Ember.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.ember/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The tracker runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EmberError, Result};

/// Main configuration struct for Ember.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Profile selection configuration.
    pub profile: ProfileConfig,
    /// Heatmap rendering configuration.
    pub heatmap: HeatmapConfig,
}

/// Profile selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileConfig {
    /// Profile used when none is given on the command line.
    pub name: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
        }
    }
}

/// Heatmap rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Number of trailing days the heatmap covers.
    pub days: u32,
}

/// Minimum valid heatmap window in days.
pub const MIN_HEATMAP_DAYS: u32 = 7;

/// Maximum valid heatmap window in days (ten years).
pub const MAX_HEATMAP_DAYS: u32 = 3660;

impl HeatmapConfig {
    /// Check if a heatmap window value is valid.
    pub fn is_valid_days(value: u32) -> bool {
        (MIN_HEATMAP_DAYS..=MAX_HEATMAP_DAYS).contains(&value)
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self { days: 365 }
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    pub fn load() -> Self {
        let mut config = match Self::user_config_path().map(|p| Self::load_from_file(&p)) {
            Some(Ok(loaded)) => loaded,
            _ => Config::default(),
        };
        config.apply_env_overrides();
        config
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| EmberError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| EmberError::config(e.to_string()))
    }

    /// Path of the user config file, `<ember_home>/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        ember_home().map(|h| h.join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // EMBER_PROFILE
        if let Ok(val) = env::var("EMBER_PROFILE") {
            if val.trim().is_empty() {
                tracing::warn!("EMBER_PROFILE is empty, keeping '{}'", self.profile.name);
            } else {
                self.profile.name = val;
            }
        }

        // EMBER_HEATMAP_DAYS
        if let Ok(val) = env::var("EMBER_HEATMAP_DAYS") {
            match val.parse::<u32>() {
                Ok(n) => {
                    if HeatmapConfig::is_valid_days(n) {
                        self.heatmap.days = n;
                    } else {
                        tracing::warn!(
                            "invalid EMBER_HEATMAP_DAYS value '{}', must be in [{}, {}], keeping '{}'",
                            n,
                            MIN_HEATMAP_DAYS,
                            MAX_HEATMAP_DAYS,
                            self.heatmap.days
                        );
                    }
                }
                Err(_) => tracing::warn!(
                    "invalid EMBER_HEATMAP_DAYS value '{}', expected a positive integer, keeping '{}'",
                    val,
                    self.heatmap.days
                ),
            }
        }
    }
}

/// Get the Ember home directory.
///
/// Checks the `EMBER_HOME` environment variable first, then falls back to
/// `~/.ember`. An empty `EMBER_HOME` is ignored; a relative one is
/// canonicalized when possible.
pub fn ember_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("EMBER_HOME") {
        if home.is_empty() {
            tracing::warn!("EMBER_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("EMBER_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".ember"));
    }

    // Fallback for containerized/minimal environments without HOME
    let fallback_path = fallback_ember_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get fallback ember home path when HOME is unavailable.
#[cfg(unix)]
fn fallback_ember_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/ember-{}", uid))
}

/// Get fallback ember home path when HOME is unavailable.
#[cfg(not(unix))]
fn fallback_ember_home() -> PathBuf {
    std::env::temp_dir().join("ember")
}

/// Get the profiles directory, `<ember_home>/profiles/`.
pub fn profiles_dir() -> Option<PathBuf> {
    ember_home().map(|h| h.join("profiles"))
}

/// Get the directory holding one profile's data files.
///
/// Returns `<ember_home>/profiles/<name>/`.
pub fn profile_dir(name: &str) -> Option<PathBuf> {
    profiles_dir().map(|p| p.join(name))
}
