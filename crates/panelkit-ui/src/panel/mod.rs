mod lifecycle;
mod rect;
mod spec;
mod types;

pub use lifecycle::{Panel, RESIZE_GRIP};
pub use rect::{PanelRect, check_canvas};
pub use spec::{DefaultPosition, PanelSpec};
pub use types::{
    HitRegion, LifecycleState, PanelKind, PersistOutcome, ResizeHandle, ResizeTypes,
};
