use std::path::PathBuf;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use hashbrown::HashMap;
use panelkit_geom::Vec2;
use panelkit_io::{Settings, TomlFileStore};
use panelkit_runtime::{Outbox, Response};
use panelkit_ui::{ContentPanel, PanelKind, StatSnapshot, StatsPanel, UiScale};

use super::transport::TransportStats;
use super::view::{HeadlessView, RowId};
use crate::event::EventQueue;

pub struct App {
    pub(super) settings_path: PathBuf,
    pub(super) settings: Settings,
    pub(super) store: TomlFileStore,
    pub(super) scale: UiScale,
    pub(super) canvas: Vec2,
    pub(super) queue: EventQueue,
    pub(super) content: ContentPanel,
    pub(super) stats: Option<StatsPanel<RowId>>,
    // Last feed epoch of a closed stats panel; a reopened one continues past it.
    pub(super) stats_epoch: u64,
    pub(super) view: HeadlessView,
    pub(super) outbox: Outbox,
    pub(super) stats_inbox: Receiver<Response<StatSnapshot>>,
    // Grab point of each in-flight gesture, by panel.
    pub(super) grabs: HashMap<PanelKind, Vec2>,
    pub(super) settings_rx: Option<Receiver<()>>,
    pub(super) transport: Option<JoinHandle<TransportStats>>,
    pub(super) tick_interval: Duration,
    pub(super) max_ticks: u64,
    pub(super) quit: bool,
}

impl App {
    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }

    pub fn scale(&self) -> UiScale {
        self.scale
    }

    pub fn tick(&self) -> u64 {
        self.queue.now
    }

    pub fn is_stats_open(&self) -> bool {
        self.stats.is_some()
    }

    pub fn view(&self) -> &HeadlessView {
        &self.view
    }
}
