//! Persistence and configuration for the panel layer.
#![forbid(unsafe_code)]

pub mod settings;
pub mod store;

pub use settings::{
    DEFAULT_FAM_STATS_INTERVAL, LayoutSettings, PanelToggles, PollingSettings, Settings, SettingsError, UiSettings,
};
pub use store::{KeyValueStore, MemoryStore, StoreError, TomlFileStore};

/// Section holding one serialized geometry record per panel kind.
pub const PANELS_SECTION: &str = "Panels";
/// Section holding runtime-toggled UI preferences.
pub const UI_SETTINGS_SECTION: &str = "UISettings";
