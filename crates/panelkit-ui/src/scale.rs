use panelkit_geom::Vec2;
use panelkit_io::{KeyValueStore, StoreError, UI_SETTINGS_SECTION};

pub const UI_SCALE_KEY: &str = "UIScale";

/// Reference resolution presets. A larger reference resolution renders the
/// panels smaller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiScale {
    Tiny,
    Small,
    #[default]
    Normal,
    Medium,
}

impl UiScale {
    pub const ALL: [UiScale; 4] = [UiScale::Tiny, UiScale::Small, UiScale::Normal, UiScale::Medium];

    pub const fn as_str(self) -> &'static str {
        match self {
            UiScale::Tiny => "tiny",
            UiScale::Small => "small",
            UiScale::Normal => "normal",
            UiScale::Medium => "medium",
        }
    }

    /// Unknown values map to [`UiScale::Normal`].
    pub fn from_stored(value: &str) -> Self {
        match value.trim() {
            "tiny" => UiScale::Tiny,
            "small" => UiScale::Small,
            "normal" => UiScale::Normal,
            "medium" => UiScale::Medium,
            other => {
                log::warn!("unknown UI scale {:?}; using normal", other);
                UiScale::Normal
            }
        }
    }

    pub fn reference_resolution(self) -> Vec2 {
        match self {
            UiScale::Tiny => Vec2::new(3840.0, 2160.0),
            UiScale::Small => Vec2::new(2560.0, 1440.0),
            UiScale::Normal => Vec2::new(1920.0, 1080.0),
            UiScale::Medium => Vec2::new(1600.0, 900.0),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(2);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> String {
        format!("Toggle screen size [{}]", self.as_str())
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        store
            .get(UI_SETTINGS_SECTION, UI_SCALE_KEY)
            .map(|v| Self::from_stored(&v))
            .unwrap_or_default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(self, store: &mut S) -> Result<(), StoreError> {
        store.set(UI_SETTINGS_SECTION, UI_SCALE_KEY, self.as_str())
    }
}
