use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

// Top-level settings file. Every table and field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub ui: UiSettings,
    pub panels: PanelToggles,
    pub polling: PollingSettings,
    pub layout: LayoutSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    // The content panel lays its actions out in a row (wide) or a column.
    pub horizontal_content_layout: bool,
    // Gap kept between a panel and the canvas edge when clamping.
    pub screen_padding: f32,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            horizontal_content_layout: true,
            screen_padding: 0.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PanelToggles {
    pub box_list: bool,
    pub fam_stats: bool,
    pub bind_buttons: bool,
    pub combat_button: bool,
    #[serde(default)]
    pub last_bind_command: Option<String>,
}

impl Default for PanelToggles {
    fn default() -> Self {
        Self {
            box_list: true,
            fam_stats: true,
            bind_buttons: true,
            combat_button: true,
            last_bind_command: None,
        }
    }
}

pub const DEFAULT_FAM_STATS_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PollingSettings {
    pub fam_stats_interval_secs: f64,
    pub command_cooldown_ms: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            fam_stats_interval_secs: DEFAULT_FAM_STATS_INTERVAL.as_secs_f64(),
            command_cooldown_ms: 2000,
        }
    }
}

impl PollingSettings {
    /// Falls back to the default interval for values [`Settings::validate`]
    /// rejects.
    pub fn fam_stats_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.fam_stats_interval_secs)
            .ok()
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_FAM_STATS_INTERVAL)
    }

    pub fn command_cooldown(&self) -> Duration {
        Duration::from_millis(self.command_cooldown_ms)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Ticks to wait after a content change before measuring rows.
    pub settle_ticks: u64,
    /// Ticks to wait after construction before the first measurement.
    pub construct_settle_ticks: u64,
    pub row_spacing: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub slack: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            settle_ticks: 1,
            construct_settle_ticks: 5,
            row_spacing: 6.0,
            padding_top: 12.0,
            padding_bottom: 12.0,
            slack: 4.0,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` when it exists; otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no settings at {}; using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let interval = self.polling.fam_stats_interval_secs;
        if Duration::try_from_secs_f64(interval).map_or(true, |d| d.is_zero()) {
            return Err(SettingsError::Invalid {
                field: "polling.fam_stats_interval_secs",
                reason: "must be a positive number of seconds",
            });
        }
        let layout = &self.layout;
        let lengths = [
            layout.row_spacing,
            layout.padding_top,
            layout.padding_bottom,
            layout.slack,
            self.ui.screen_padding,
        ];
        if lengths.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SettingsError::Invalid {
                field: "layout",
                reason: "lengths must be finite and non-negative",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.polling.fam_stats_interval(), Duration::from_secs(1));
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let s = Settings::from_toml_str(
            r#"
            [polling]
            fam_stats_interval_secs = 2.5

            [panels]
            combat_button = false
            last_bind_command = ".fam bind 3"
        "#,
        )
        .unwrap();
        assert_eq!(s.polling.fam_stats_interval(), Duration::from_millis(2500));
        assert_eq!(s.polling.command_cooldown_ms, 2000);
        assert!(!s.panels.combat_button);
        assert!(s.panels.fam_stats);
        assert_eq!(s.panels.last_bind_command.as_deref(), Some(".fam bind 3"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = Settings::from_toml_str("[polling]\nfam_stats_interval_secs = 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "polling.fam_stats_interval_secs",
                ..
            }
        ));
    }

    #[test]
    fn unknown_ui_keys_are_ignored() {
        let s = Settings::from_toml_str("[ui]\ntransparency = 0.4\nscreen_padding = 8.0\n")
            .unwrap();
        assert_eq!(s.ui.screen_padding, 8.0);
    }

    #[test]
    fn interval_too_large_for_a_duration_is_rejected() {
        let err =
            Settings::from_toml_str("[polling]\nfam_stats_interval_secs = 1e30\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "polling.fam_stats_interval_secs",
                ..
            }
        ));

        let mut polling = PollingSettings::default();
        polling.fam_stats_interval_secs = 1e30;
        assert_eq!(polling.fam_stats_interval(), DEFAULT_FAM_STATS_INTERVAL);
        polling.fam_stats_interval_secs = f64::NAN;
        assert_eq!(polling.fam_stats_interval(), DEFAULT_FAM_STATS_INTERVAL);
    }

    #[test]
    fn negative_spacing_is_rejected() {
        assert!(Settings::from_toml_str("[layout]\nrow_spacing = -1.0\n").is_err());
    }
}
