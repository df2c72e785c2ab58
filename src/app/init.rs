use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::unbounded;
use hashbrown::HashMap;
use panelkit_io::{Settings, TomlFileStore};
use panelkit_runtime::Outbox;
use panelkit_ui::{ContentPanel, UiScale};

use super::script::{DEFAULT_SCRIPT, Script};
use super::state::App;
use super::transport::{self, TransportConfig};
use super::view::HeadlessView;
use super::watchers;
use crate::event::EventQueue;

const ROW_HEIGHT: f32 = 36.0;

#[derive(Clone, Debug)]
pub struct AppOptions {
    pub settings_path: PathBuf,
    pub store_path: PathBuf,
    pub script_path: Option<PathBuf>,
    pub max_ticks: u64,
    pub tick_interval: Duration,
    pub watch_settings: bool,
    pub transport: TransportConfig,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from("panelkit.toml"),
            store_path: PathBuf::from("panelkit_store.toml"),
            script_path: None,
            max_ticks: 600,
            tick_interval: Duration::from_millis(16),
            watch_settings: false,
            transport: TransportConfig::default(),
        }
    }
}

impl App {
    pub fn new(options: AppOptions) -> Result<Self, Box<dyn Error>> {
        let settings = match Settings::load_or_default(&options.settings_path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!(
                    "settings {} unusable ({}); using defaults",
                    options.settings_path.display(),
                    e
                );
                Settings::default()
            }
        };
        let mut store = TomlFileStore::open_or_empty(&options.store_path);
        let scale = UiScale::load(&store);
        let canvas = scale.reference_resolution();
        log::info!(
            "ui scale {:?}, reference resolution {}x{}",
            scale,
            canvas.x,
            canvas.y
        );

        let (outbox, requests) = Outbox::channel();
        let (replies_tx, stats_inbox) = unbounded();
        let transport = transport::spawn(requests, replies_tx, options.transport)?;

        let mut content = ContentPanel::new(canvas, &settings, outbox.clone());
        if let Some(restored) = content.panel_mut().late_construct(&mut store) {
            log::info!("content panel restored from {:?}", restored.source);
        }

        let script = match &options.script_path {
            Some(path) => Script::load(path)?,
            None => Script::parse(DEFAULT_SCRIPT)?,
        };
        let mut queue = EventQueue::new();
        let scheduled = script.schedule(&mut queue);
        log::info!("scheduled {} scripted events", scheduled);

        let settings_rx = if options.watch_settings {
            Some(watchers::watch_settings(options.settings_path.clone()))
        } else {
            None
        };

        Ok(Self {
            settings_path: options.settings_path,
            settings,
            store,
            scale,
            canvas,
            queue,
            content,
            stats: None,
            stats_epoch: 0,
            view: HeadlessView::new(ROW_HEIGHT),
            outbox,
            stats_inbox,
            grabs: HashMap::new(),
            settings_rx,
            transport: Some(transport),
            tick_interval: options.tick_interval,
            max_ticks: options.max_ticks,
            quit: false,
        })
    }
}
