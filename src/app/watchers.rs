use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};
use panelkit_io::Settings;

use super::state::App;
use crate::event::Event;

/// Watches the settings file on a background thread; each change sends a unit
/// notification.
pub(super) fn watch_settings(path: PathBuf) -> Receiver<()> {
    let (tx, rx) = unbounded::<()>();
    let spawned = thread::Builder::new()
        .name("settings-watch".into())
        .spawn(move || {
            use notify::{EventKind, RecursiveMode, Watcher};
            let watcher =
                notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
                    if let Ok(event) = res {
                        match event.kind {
                            EventKind::Modify(_)
                            | EventKind::Create(_)
                            | EventKind::Remove(_)
                            | EventKind::Any => {
                                let _ = tx.send(());
                            }
                            _ => {}
                        }
                    }
                });
            let mut watcher = match watcher {
                Ok(w) => w,
                Err(e) => {
                    log::warn!("settings watcher unavailable: {}", e);
                    return;
                }
            };
            if let Err(e) = watcher.watch(path.as_path(), RecursiveMode::NonRecursive) {
                log::warn!("cannot watch {}: {}", path.display(), e);
                return;
            }
            log::info!("watching {} for changes", path.display());
            loop {
                thread::sleep(Duration::from_secs(3600));
            }
        });
    if let Err(e) = spawned {
        log::warn!("failed to spawn settings watcher: {}", e);
    }
    rx
}

impl App {
    /// Collapses pending file notifications into one `SettingsChanged` on the
    /// next tick.
    pub(super) fn process_settings_events(&mut self) {
        let Some(rx) = self.settings_rx.as_ref() else {
            return;
        };
        if rx.try_iter().count() > 0 {
            self.queue.emit_after(1, Event::SettingsChanged);
        }
    }

    pub(super) fn reload_settings(&mut self) {
        let settings = match Settings::load(&self.settings_path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!(
                    "settings reload failed ({}); keeping previous settings",
                    e
                );
                return;
            }
        };
        if settings == self.settings {
            log::debug!("settings unchanged");
            return;
        }
        self.content.apply_settings(&settings);
        if let Some(stats) = self.stats.as_mut() {
            stats.apply_settings(&settings);
        }
        log::info!(
            "settings reloaded: {} content actions, stats every {:?}",
            self.content.actions().len(),
            settings.polling.fam_stats_interval()
        );
        self.settings = settings;
    }
}
