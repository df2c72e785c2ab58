use std::fmt::Debug;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use panelkit_geom::{Restored, Vec2};
use panelkit_io::{KeyValueStore, LayoutSettings, Settings};
use panelkit_runtime::{Feed, Outbox, RequestKind, Response};

use super::{ProgressTracker, StatSnapshot};
use crate::panel::{LifecycleState, Panel, PanelSpec};
use crate::rows::{HeightMetrics, HeightRecalculator, ReconcileReport, RowPool, RowWidgets};

/// Header and progress widgets of the stats panel, on top of its rows.
pub trait StatsView: RowWidgets {
    fn set_header(&mut self, name_line: &str, level_line: &str);
    fn set_progress(&mut self, fraction: f32, label: &str, flash: bool);
}

/// What one host tick did to the stats panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsTick {
    pub requested: bool,
    pub snapshots: usize,
    pub reconcile: ReconcileReport,
    pub flashed: bool,
    pub height: Option<f32>,
}

/// The familiar stats panel: a [`Panel`] plus a pooled row reconciler fed by
/// a periodic request.
pub struct StatsPanel<H> {
    panel: Panel,
    rows: RowPool<H>,
    height: HeightRecalculator,
    progress: ProgressTracker,
    feed: Feed<StatSnapshot>,
    construct_settle_ticks: u64,
}

impl<H: Copy + Debug> StatsPanel<H> {
    pub fn new(
        canvas: Vec2,
        settings: &Settings,
        outbox: Outbox,
        inbox: Receiver<Response<StatSnapshot>>,
    ) -> Self {
        let layout = &settings.layout;
        Self {
            panel: Panel::new(PanelSpec::fam_stats(), canvas, settings.ui.screen_padding),
            rows: RowPool::new(),
            height: HeightRecalculator::new(HeightMetrics::from(layout), layout.settle_ticks),
            progress: ProgressTracker::default(),
            feed: Feed::new(
                RequestKind::FamStats,
                outbox,
                inbox,
                settings.polling.fam_stats_interval(),
            ),
            construct_settle_ticks: layout.construct_settle_ticks,
        }
    }

    /// Keeps responses meant for a previous stats panel on the same channel
    /// from being accepted by this one.
    pub fn resume_after(mut self, epoch: u64) -> Self {
        self.feed.resume_after(epoch);
        self
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel {
        &mut self.panel
    }

    pub fn rows(&self) -> &RowPool<H> {
        &self.rows
    }

    pub fn feed(&self) -> &Feed<StatSnapshot> {
        &self.feed
    }

    pub fn is_height_pending(&self) -> bool {
        self.height.is_pending()
    }

    /// Restores geometry, starts polling and arms the first measurement with
    /// the longer construction delay.
    pub fn late_construct<S>(&mut self, store: &mut S, tick: u64, now: Instant) -> Option<Restored>
    where
        S: KeyValueStore + ?Sized,
    {
        let restored = self.panel.late_construct(store)?;
        self.height.schedule_after(tick, self.construct_settle_ticks);
        self.feed.start(now);
        Some(restored)
    }

    /// Called once per host tick.
    pub fn update<V>(&mut self, tick: u64, now: Instant, view: &mut V) -> StatsTick
    where
        V: StatsView<Handle = H> + ?Sized,
    {
        let mut out = StatsTick::default();
        if self.panel.state() == LifecycleState::Closed {
            return out;
        }
        out.requested = self.feed.poll(now);
        for snapshot in self.feed.drain() {
            let (report, flashed) = self.apply_snapshot(&snapshot, tick, view);
            out.reconcile.merge(&report);
            out.flashed |= flashed;
            out.snapshots += 1;
        }
        if let Some(height) = self.height.poll(tick, &self.rows, view) {
            log::debug!(target: "rows", "stats panel content height {}", height);
            self.panel.set_content_height(height);
            out.height = Some(height);
        }
        out
    }

    /// Pushes one accepted snapshot into the header, progress bar and rows.
    /// Returns the reconcile report and whether the progress bar flashed.
    pub fn apply_snapshot<V>(
        &mut self,
        snapshot: &StatSnapshot,
        tick: u64,
        view: &mut V,
    ) -> (ReconcileReport, bool)
    where
        V: StatsView<Handle = H> + ?Sized,
    {
        let flash = self.progress.observe(snapshot.experience_percent);
        view.set_header(&snapshot.name_line(), &snapshot.level_line());
        view.set_progress(
            snapshot.progress_fraction(),
            &snapshot.progress_label(),
            flash,
        );
        let report = self.rows.reconcile(snapshot.rows(), view);
        // A rewritten value can change a row's preferred height.
        if report.updated > 0 || report.visibility_changed() {
            self.height.schedule(tick);
        }
        (report, flash)
    }

    /// Clears transient live-data state: polling stops (late responses are
    /// dropped), rows are hidden but kept, and no measurement stays armed.
    /// Geometry and the progress baseline are untouched.
    pub fn reset<V>(&mut self, view: &mut V)
    where
        V: StatsView<Handle = H> + ?Sized,
    {
        self.feed.stop();
        self.height.cancel();
        let hidden = self.rows.hide_all(view);
        self.panel.reset();
        log::info!("stats panel reset ({} rows hidden)", hidden);
    }

    /// Resumes polling after a [`reset`](Self::reset).
    pub fn activate(&mut self, tick: u64, now: Instant) {
        if !self.panel.is_interactive() {
            return;
        }
        self.feed.start(now);
        self.height.schedule(tick);
    }

    /// Teardown: stops polling and destroys every pooled row.
    pub fn close<V>(&mut self, view: &mut V)
    where
        V: StatsView<Handle = H> + ?Sized,
    {
        self.feed.stop();
        self.height.cancel();
        self.rows.clear(view);
        self.panel.close();
    }

    /// Re-clamps for a new reference resolution and re-measures.
    pub fn set_canvas(&mut self, canvas: Vec2, tick: u64) {
        self.panel.set_canvas(canvas);
        if self.panel.is_interactive() {
            self.height.schedule(tick);
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        let layout: &LayoutSettings = &settings.layout;
        self.height
            .set_metrics(HeightMetrics::from(layout), layout.settle_ticks);
        self.construct_settle_ticks = layout.construct_settle_ticks;
        self.set_poll_interval(settings.polling.fam_stats_interval());
    }

    pub fn set_poll_interval(&mut self, interval: Duration) {
        self.feed.set_interval(interval);
    }
}
