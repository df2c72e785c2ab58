//! Movable overlay panels with persisted geometry, plus the pooled stat rows
//! of the familiar stats panel.
#![forbid(unsafe_code)]

pub mod content;
pub mod panel;
pub mod rows;
pub mod scale;
pub mod stats;

pub use content::{ActionEffect, ContentAction, ContentPanel};
pub use panel::{
    DefaultPosition, HitRegion, LifecycleState, Panel, PanelKind, PanelSpec, PersistOutcome,
    ResizeHandle, ResizeTypes,
};
pub use rows::{
    HeightMetrics, HeightRecalculator, MissingRowWidget, ReconcileReport, RowEntry, RowPool,
    RowWidgets,
};
pub use scale::UiScale;
pub use stats::{StatSnapshot, StatsPanel, StatsTick, StatsView};
