//! Keyed, pooled stat rows and the deferred height measurement that follows
//! every change in visible rows.

mod height;
mod pool;

pub use height::{HeightMetrics, HeightRecalculator};
pub use pool::{MissingRowWidget, ReconcileReport, RowEntry, RowPool, RowWidgets};
