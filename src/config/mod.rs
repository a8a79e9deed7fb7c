// SPDX-License-Identifier: MPL-2.0
//! Read-only application configuration loaded from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - UI language
//! - `[playback]` - Keyboard seek and volume steps
//! - `[overlay]` - Action message lifetime and controls auto-hide timeout
//!
//! # Path Resolution
//!
//! 1. Use `load_from_path()` with an explicit path
//! 2. `--config-dir` on the command line or `DROPPLAY_CONFIG_DIR`
//! 3. Falls back to the platform-specific config directory
//!
//! The viewer never writes this file back; every field is optional and falls
//! back to [`defaults`].
//!
//! # Examples
//!
//! ```no_run
//! use dropplay::config;
//!
//! let (config, warning) = config::load();
//! assert!(warning.is_none() || config == config::Config::default());
//! println!("seek step: {}s", config.playback.seek_step().as_secs_f64());
//! ```

pub mod defaults;

pub use defaults::*;

use crate::app::paths;
use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

/// Warning key reported when the config file exists but cannot be parsed.
pub const CONFIG_LOAD_WARNING: &str = "notification-config-load-error";

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "ja").
    #[serde(default)]
    pub language: Option<String>,
}

/// Keyboard playback settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct PlaybackConfig {
    /// Seconds skipped by `h` / `l`.
    #[serde(default)]
    pub seek_step_secs: Option<f64>,

    /// Volume change applied by `j` / `k` (0.0 to 1.0 scale).
    #[serde(default)]
    pub volume_step: Option<f32>,
}

impl PlaybackConfig {
    /// Seek step with the configured value clamped into the supported range.
    #[must_use]
    pub fn seek_step(&self) -> Duration {
        let secs = self
            .seek_step_secs
            .filter(|secs| secs.is_finite())
            .unwrap_or(DEFAULT_SEEK_STEP_SECS)
            .clamp(MIN_SEEK_STEP_SECS, MAX_SEEK_STEP_SECS);
        Duration::from_secs_f64(secs)
    }

    /// Volume step with the configured value clamped into the supported range.
    #[must_use]
    pub fn volume_step(&self) -> f32 {
        self.volume_step
            .filter(|step| step.is_finite() && *step > 0.0)
            .unwrap_or(DEFAULT_VOLUME_STEP)
            .min(MAX_VOLUME_STEP)
    }
}

/// Overlay timing settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct OverlayConfig {
    /// Lifetime of the action message in the corner (milliseconds).
    #[serde(default)]
    pub message_duration_ms: Option<u64>,

    /// Inactivity before the seek bar hides (seconds).
    #[serde(default)]
    pub controls_timeout_secs: Option<u64>,
}

impl OverlayConfig {
    #[must_use]
    pub fn message_duration(&self) -> Duration {
        let ms = self
            .message_duration_ms
            .unwrap_or(DEFAULT_OVERLAY_MESSAGE_MS)
            .clamp(MIN_OVERLAY_MESSAGE_MS, MAX_OVERLAY_MESSAGE_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn controls_timeout(&self) -> Duration {
        let secs = self
            .controls_timeout_secs
            .unwrap_or(DEFAULT_CONTROLS_TIMEOUT_SECS)
            .clamp(MIN_CONTROLS_TIMEOUT_SECS, MAX_CONTROLS_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }
}

// =============================================================================
// Main Config Struct (Sectioned)
// =============================================================================

/// Application configuration with logical sections.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,
}

// =============================================================================
// Load Functions
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "falling back to default config");
                    return (Config::default(), Some(CONFIG_LOAD_WARNING.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_utils::assert_abs_diff_eq;
    use tempfile::tempdir;

    #[test]
    fn load_from_path_reads_all_sections() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(
            &config_path,
            r#"
[general]
language = "ja"

[playback]
seek_step_secs = 10.0
volume_step = 0.1

[overlay]
message_duration_ms = 1000
controls_timeout_secs = 5
"#,
        )
        .expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded.general.language.as_deref(), Some("ja"));
        assert_eq!(loaded.playback.seek_step(), Duration::from_secs(10));
        assert_abs_diff_eq!(loaded.playback.volume_step(), 0.1);
        assert_eq!(loaded.overlay.message_duration(), Duration::from_secs(1));
        assert_eq!(loaded.overlay.controls_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[general]\n").expect("failed to write config");

        let loaded = load_from_path(&config_path).expect("failed to load config");

        assert_eq!(loaded, Config::default());
        assert_eq!(
            loaded.playback.seek_step(),
            Duration::from_secs_f64(DEFAULT_SEEK_STEP_SECS)
        );
        assert_abs_diff_eq!(loaded.playback.volume_step(), DEFAULT_VOLUME_STEP);
        assert_eq!(
            loaded.overlay.message_duration(),
            Duration::from_millis(DEFAULT_OVERLAY_MESSAGE_MS)
        );
        assert_eq!(
            loaded.overlay.controls_timeout(),
            Duration::from_secs(DEFAULT_CONTROLS_TIMEOUT_SECS)
        );
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "not = valid = toml").expect("failed to write invalid toml");

        let err = load_from_path(&config_path).expect_err("invalid toml should error");
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_with_override_returns_warning_for_bad_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(CONFIG_FILE), "[playback\n").expect("failed to write");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert_eq!(warning.as_deref(), Some(CONFIG_LOAD_WARNING));
    }

    #[test]
    fn load_with_override_without_file_is_silent() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));

        assert_eq!(config, Config::default());
        assert!(warning.is_none());
    }

    #[test]
    fn loading_leaves_the_directory_untouched() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join(CONFIG_FILE);
        let contents = "[playback]\nseek_step_secs = 8.0\n";
        fs::write(&path, contents).expect("failed to write");

        let _ = load_with_override(Some(temp_dir.path().to_path_buf()));
        let _ = load_with_override(Some(temp_dir.path().join("missing")));

        assert_eq!(fs::read_to_string(&path).expect("failed to read"), contents);
        assert!(!temp_dir.path().join("missing").exists());
        assert_eq!(fs::read_dir(temp_dir.path()).expect("failed to list").count(), 1);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = Config {
            playback: PlaybackConfig {
                seek_step_secs: Some(1000.0),
                volume_step: Some(-1.0),
            },
            overlay: OverlayConfig {
                message_duration_ms: Some(1),
                controls_timeout_secs: Some(0),
            },
            ..Config::default()
        };

        assert_eq!(
            config.playback.seek_step(),
            Duration::from_secs_f64(MAX_SEEK_STEP_SECS)
        );
        assert_abs_diff_eq!(config.playback.volume_step(), DEFAULT_VOLUME_STEP);
        assert_eq!(
            config.overlay.message_duration(),
            Duration::from_millis(MIN_OVERLAY_MESSAGE_MS)
        );
        assert_eq!(
            config.overlay.controls_timeout(),
            Duration::from_secs(MIN_CONTROLS_TIMEOUT_SECS)
        );
    }
}
