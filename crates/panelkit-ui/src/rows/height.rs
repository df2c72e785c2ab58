use std::fmt::Debug;

use panelkit_io::LayoutSettings;

use super::{RowPool, RowWidgets};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightMetrics {
    pub row_spacing: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub slack: f32,
}

impl Default for HeightMetrics {
    fn default() -> Self {
        Self::from(&LayoutSettings::default())
    }
}

impl From<&LayoutSettings> for HeightMetrics {
    fn from(layout: &LayoutSettings) -> Self {
        Self {
            row_spacing: layout.row_spacing,
            padding_top: layout.padding_top,
            padding_bottom: layout.padding_bottom,
            slack: layout.slack,
        }
    }
}

impl HeightMetrics {
    /// `sum(row heights) + spacing * (n - 1) + padding + slack`
    pub fn total<I: IntoIterator<Item = f32>>(&self, row_heights: I) -> f32 {
        let mut n = 0usize;
        let mut sum = 0.0f32;
        for h in row_heights {
            sum += h;
            n += 1;
        }
        let gaps = n.saturating_sub(1) as f32;
        sum + self.row_spacing * gaps + self.padding_top + self.padding_bottom + self.slack
    }
}

/// Deferred content-height measurement. Rows only report a meaningful
/// preferred height after the host has laid them out, so a measurement is
/// armed for a later tick and taken once that tick is reached.
#[derive(Debug)]
pub struct HeightRecalculator {
    metrics: HeightMetrics,
    settle_ticks: u64,
    due: Option<u64>,
}

impl HeightRecalculator {
    pub fn new(metrics: HeightMetrics, settle_ticks: u64) -> Self {
        Self {
            metrics,
            settle_ticks: settle_ticks.max(1),
            due: None,
        }
    }

    pub fn metrics(&self) -> &HeightMetrics {
        &self.metrics
    }

    pub fn set_metrics(&mut self, metrics: HeightMetrics, settle_ticks: u64) {
        self.metrics = metrics;
        self.settle_ticks = settle_ticks.max(1);
    }

    pub fn schedule(&mut self, now: u64) {
        self.schedule_after(now, self.settle_ticks);
    }

    /// Arms a measurement `ticks` from now (at least one). Requests coalesce:
    /// the latest due tick wins.
    pub fn schedule_after(&mut self, now: u64, ticks: u64) {
        let due = now.saturating_add(ticks.max(1));
        self.due = Some(self.due.map_or(due, |d| d.max(due)));
        log::trace!(target: "rows", "height recalculation due at tick {}", due);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn due_tick(&self) -> Option<u64> {
        self.due
    }

    /// Measures once the due tick has been reached.
    pub fn poll<H, W>(&mut self, now: u64, pool: &RowPool<H>, widgets: &W) -> Option<f32>
    where
        H: Copy + Debug,
        W: RowWidgets<Handle = H> + ?Sized,
    {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                Some(self.measure(pool, widgets))
            }
            _ => None,
        }
    }

    pub fn measure<H, W>(&self, pool: &RowPool<H>, widgets: &W) -> f32
    where
        H: Copy + Debug,
        W: RowWidgets<Handle = H> + ?Sized,
    {
        self.metrics
            .total(pool.visible().map(|e| widgets.preferred_height(e.widget)))
    }
}
