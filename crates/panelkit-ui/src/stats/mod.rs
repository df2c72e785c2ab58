mod panel;
mod snapshot;

pub use panel::{StatsPanel, StatsTick, StatsView};
pub use snapshot::{FIXED_KEYS, ProgressTracker, StatSnapshot};
