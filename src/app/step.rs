use std::thread;
use std::time::Instant;

use panelkit_geom::Vec2;
use panelkit_ui::{
    ActionEffect, ContentAction, ContentPanel, Panel, PanelKind, ResizeHandle, StatsPanel,
};

use super::state::App;
use super::transport::TransportStats;
use super::view::RowId;
use crate::event::{Event, EventEnvelope};

const MAX_EVENTS_PER_TICK: usize = 1_000;

fn panel_of<'a>(
    content: &'a mut ContentPanel,
    stats: &'a mut Option<StatsPanel<RowId>>,
    kind: PanelKind,
) -> Option<&'a mut Panel> {
    match kind {
        PanelKind::Base => Some(content.panel_mut()),
        PanelKind::FamStats => stats.as_mut().map(StatsPanel::panel_mut),
    }
}

// Point on the outer rect that a pointer would grab for `handle`.
fn grip_point(panel: &Panel, handle: ResizeHandle) -> Vec2 {
    let r = panel.outer();
    let c = r.center();
    let x = if handle.moves_left() {
        r.x
    } else if handle.moves_right() {
        r.right()
    } else {
        c.x
    };
    let y = if handle.moves_top() {
        r.y
    } else if handle.moves_bottom() {
        r.bottom()
    } else {
        c.y
    };
    Vec2::new(x, y)
}

impl App {
    /// Runs until the script quits or the tick limit is reached, then shuts
    /// the transport down.
    pub fn run(mut self) -> Option<TransportStats> {
        while !self.quit && self.queue.now < self.max_ticks {
            self.step(Instant::now());
            if !self.tick_interval.is_zero() {
                thread::sleep(self.tick_interval);
            }
        }
        let canvas = self.canvas();
        log::info!(
            "stopping at tick {}: scale {:?} ({}x{}), stats panel {}, {} live rows",
            self.tick(),
            self.scale(),
            canvas.x,
            canvas.y,
            if self.is_stats_open() { "open" } else { "closed" },
            self.view().live_rows()
        );
        if self.queue.pending() > 0 {
            log::debug!("{} scheduled events left unprocessed", self.queue.pending());
        }
        self.shutdown()
    }

    /// One host tick: settings notifications, scheduled events, then the
    /// stats panel's poll/apply/measure cycle.
    pub fn step(&mut self, now: Instant) {
        self.process_settings_events();
        let mut processed = 0usize;
        while let Some(env) = self.queue.pop_ready() {
            self.handle_event(env, now);
            processed += 1;
            if processed >= MAX_EVENTS_PER_TICK {
                log::warn!("event budget exhausted at tick {}", self.queue.now);
                break;
            }
        }
        let tick = self.queue.now;
        if let Some(stats) = self.stats.as_mut() {
            let out = stats.update(tick, now, &mut self.view);
            if out.snapshots > 0 {
                log::debug!(target: "view", "{}", self.view.describe());
            }
            if out.reconcile.visibility_changed() {
                log::debug!(
                    target: "rows",
                    "tick {}: {} created, {} shown, {} hidden",
                    tick,
                    out.reconcile.created,
                    out.reconcile.shown,
                    out.reconcile.hidden
                );
            }
        }
        self.queue.advance_tick();
    }

    fn handle_event(&mut self, env: EventEnvelope, now: Instant) {
        log::debug!(target: "events", "#{} @{} {:?}", env.id, env.tick, env.kind);
        match env.kind {
            Event::DragStarted { kind } => {
                let Some(panel) = panel_of(&mut self.content, &mut self.stats, kind) else {
                    log::debug!("drag on closed panel {:?}", kind);
                    return;
                };
                let grab = panel.outer().center();
                if panel.begin_drag(grab) {
                    self.grabs.insert(kind, grab);
                }
            }
            Event::DragMoved { kind, offset } => {
                let Some(grab) = self.grabs.get(&kind).copied() else {
                    return;
                };
                if let Some(panel) = panel_of(&mut self.content, &mut self.stats, kind) {
                    panel.update_drag(grab + offset);
                }
            }
            Event::DragFinished { kind } => {
                self.grabs.remove(&kind);
                let Some(panel) = panel_of(&mut self.content, &mut self.stats, kind) else {
                    return;
                };
                if let Some(outcome) = panel.finish_drag(&mut self.store) {
                    log::info!("{} moved: {:?}", kind.as_str(), outcome);
                }
            }
            Event::ResizeStarted { kind, handle } => {
                let Some(panel) = panel_of(&mut self.content, &mut self.stats, kind) else {
                    return;
                };
                let grab = grip_point(panel, handle);
                if panel.begin_resize(grab, handle) {
                    self.grabs.insert(kind, grab);
                } else {
                    log::debug!("{} does not resize via {:?}", kind.as_str(), handle);
                }
            }
            Event::ResizeMoved { kind, offset } => {
                let Some(grab) = self.grabs.get(&kind).copied() else {
                    return;
                };
                if let Some(panel) = panel_of(&mut self.content, &mut self.stats, kind) {
                    panel.update_resize(grab + offset);
                }
            }
            Event::ResizeFinished { kind } => {
                self.grabs.remove(&kind);
                let Some(panel) = panel_of(&mut self.content, &mut self.stats, kind) else {
                    return;
                };
                if let Some(outcome) = panel.finish_resize(&mut self.store) {
                    log::info!("{} resized: {:?}", kind.as_str(), outcome);
                }
            }
            Event::ActionPressed(action) => self.press(action, now),
            Event::OpenPanel(kind) => self.open_panel(kind, now),
            Event::ClosePanel(kind) => self.close_panel(kind),
            Event::SessionLeft => {
                log::info!("session left");
                self.grabs.clear();
                self.content.panel_mut().reset();
                if let Some(stats) = self.stats.as_mut() {
                    stats.reset(&mut self.view);
                }
            }
            Event::SessionJoined => {
                log::info!("session joined");
                if let Some(stats) = self.stats.as_mut() {
                    stats.activate(self.queue.now, now);
                }
            }
            Event::SettingsChanged => self.reload_settings(),
            Event::Quit => self.quit = true,
        }
    }

    fn press(&mut self, action: ContentAction, now: Instant) {
        match self.content.trigger(action, now) {
            ActionEffect::OpenBoxList => log::info!("box list requested"),
            ActionEffect::OpenPanel(kind) => self.open_panel(kind, now),
            ActionEffect::CycleScale => self.cycle_scale(),
            ActionEffect::Sent(kind) => log::debug!("{:?} queued", kind),
            ActionEffect::CoolingDown => log::info!("{} is cooling down", action.label()),
            ActionEffect::Ignored => {}
            ActionEffect::TransportClosed => log::warn!("transport gone; {:?} lost", action),
        }
    }

    fn open_panel(&mut self, kind: PanelKind, now: Instant) {
        match kind {
            PanelKind::Base => log::debug!("content panel is always open"),
            PanelKind::FamStats if self.stats.is_some() => {
                log::debug!("stats panel already open");
            }
            PanelKind::FamStats => {
                let mut stats = StatsPanel::new(
                    self.canvas,
                    &self.settings,
                    self.outbox.clone(),
                    self.stats_inbox.clone(),
                )
                .resume_after(self.stats_epoch);
                if let Some(restored) = stats.late_construct(&mut self.store, self.queue.now, now) {
                    log::info!("stats panel opened ({:?} geometry)", restored.source);
                }
                self.stats = Some(stats);
            }
        }
    }

    fn close_panel(&mut self, kind: PanelKind) {
        match kind {
            PanelKind::Base => log::debug!("content panel cannot be closed"),
            PanelKind::FamStats => {
                let Some(mut stats) = self.stats.take() else {
                    return;
                };
                self.grabs.remove(&kind);
                stats.close(&mut self.view);
                self.stats_epoch = stats.feed().epoch();
                log::info!(
                    "stats panel closed ({} stale responses dropped)",
                    stats.feed().stale_dropped()
                );
            }
        }
    }

    fn cycle_scale(&mut self) {
        self.scale = self.scale.next();
        if let Err(e) = self.scale.save(&mut self.store) {
            log::error!("failed to persist ui scale: {}", e);
        }
        self.canvas = self.scale.reference_resolution();
        log::info!(
            "{} -> {}x{}",
            self.scale.label(),
            self.canvas.x,
            self.canvas.y
        );
        self.content.panel_mut().set_canvas(self.canvas);
        if let Some(stats) = self.stats.as_mut() {
            stats.set_canvas(self.canvas, self.queue.now);
        }
    }

    fn shutdown(mut self) -> Option<TransportStats> {
        if let Some(mut stats) = self.stats.take() {
            stats.close(&mut self.view);
        }
        let handle = self.transport.take();
        // The transport thread exits once every request sender is dropped.
        drop(self);
        let stats = match handle?.join() {
            Ok(stats) => stats,
            Err(_) => {
                log::error!("transport thread panicked");
                return None;
            }
        };
        log::info!(
            "transport: {} requests, {} answered, {} dropped, {} commands",
            stats.requests,
            stats.answered,
            stats.dropped,
            stats.commands
        );
        Some(stats)
    }
}
