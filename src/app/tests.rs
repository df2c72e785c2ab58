use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use panelkit_geom::serialize;
use panelkit_io::{KeyValueStore, PANELS_SECTION, TomlFileStore};
use panelkit_ui::{ContentAction, LifecycleState, UiScale};
use tempfile::TempDir;

use super::{App, AppOptions, TransportConfig};

const OPEN_AND_DRAG: &str = r#"
[[step]]
at = 1
op = { kind = "press", action = "open_fam_stats" }

[[step]]
at = 3
op = { kind = "drag", panel = "fam_stats", dx = -200.0, dy = -300.0, steps = 2 }

[[step]]
at = 10
op = { kind = "quit" }
"#;

const OPEN_ONLY: &str = r#"
[[step]]
at = 1
op = { kind = "open", panel = "fam_stats" }
"#;

fn options(dir: &Path, script: &str) -> AppOptions {
    let script_path = dir.join("script.toml");
    fs::write(&script_path, script).unwrap();
    AppOptions {
        settings_path: dir.join("settings.toml"),
        store_path: dir.join("store.toml"),
        script_path: Some(script_path),
        max_ticks: 50,
        tick_interval: Duration::ZERO,
        watch_settings: false,
        transport: TransportConfig {
            latency: Duration::ZERO,
            drop_every: 0,
            duplicate_every: 0,
        },
    }
}

fn step_until(app: &mut App, tick: u64) {
    while app.tick() < tick {
        app.step(Instant::now());
    }
}

#[test]
fn scripted_drag_is_persisted_to_the_store_file() {
    let dir = TempDir::new().unwrap();
    let opts = options(dir.path(), OPEN_AND_DRAG);
    let store_path = opts.store_path.clone();
    let mut app = App::new(opts).unwrap();

    step_until(&mut app, 3);
    assert!(app.is_stats_open());
    let before = app.stats.as_ref().unwrap().panel().geometry();

    step_until(&mut app, 7);
    let stats = app.stats.as_ref().unwrap();
    assert_eq!(stats.panel().state(), LifecycleState::Interactive);
    let after = stats.panel().geometry();
    assert_ne!(before, after);

    let store = TomlFileStore::open(&store_path).unwrap();
    assert_eq!(
        store.get(PANELS_SECTION, "FamStats"),
        Some(serialize(&after))
    );
    assert!(app.run().is_some());
}

#[test]
fn reopened_app_restores_the_dragged_panel() {
    let dir = TempDir::new().unwrap();
    let mut first = App::new(options(dir.path(), OPEN_AND_DRAG)).unwrap();
    step_until(&mut first, 7);
    let saved = first.stats.as_ref().unwrap().panel().geometry();
    first.run();

    let mut second = App::new(options(dir.path(), OPEN_ONLY)).unwrap();
    step_until(&mut second, 2);
    let restored = second.stats.as_ref().unwrap().panel().geometry();
    assert_eq!(restored, saved);
}

#[test]
fn cycling_the_scale_persists_and_reclamps() {
    let dir = TempDir::new().unwrap();
    let script = r#"
        [[step]]
        at = 1
        op = { kind = "press", action = "cycle_scale" }
    "#;
    let opts = options(dir.path(), script);
    let store_path = opts.store_path.clone();
    let mut app = App::new(opts).unwrap();
    assert_eq!(app.scale(), UiScale::Normal);

    step_until(&mut app, 2);
    assert_eq!(app.scale(), UiScale::Medium);
    assert_eq!(app.canvas(), UiScale::Medium.reference_resolution());
    assert_eq!(app.content.panel().canvas(), app.canvas());

    let store = TomlFileStore::open(&store_path).unwrap();
    assert_eq!(UiScale::load(&store), UiScale::Medium);
}

#[test]
fn closing_and_reopening_continues_the_feed_epoch() {
    let dir = TempDir::new().unwrap();
    let script = r#"
        [[step]]
        at = 1
        op = { kind = "open", panel = "fam_stats" }

        [[step]]
        at = 3
        op = { kind = "close", panel = "fam_stats" }

        [[step]]
        at = 4
        op = { kind = "open", panel = "fam_stats" }
    "#;
    let mut app = App::new(options(dir.path(), script)).unwrap();
    step_until(&mut app, 2);
    let first_epoch = app.stats.as_ref().unwrap().feed().epoch();

    step_until(&mut app, 4);
    assert!(!app.is_stats_open());
    assert_eq!(app.view().live_rows(), 0);

    step_until(&mut app, 5);
    let second_epoch = app.stats.as_ref().unwrap().feed().epoch();
    assert!(second_epoch > first_epoch);
}

#[test]
fn settings_reload_updates_enabled_actions() {
    let dir = TempDir::new().unwrap();
    let opts = options(dir.path(), OPEN_ONLY);
    fs::write(&opts.settings_path, "[panels]\nbox_list = false\n").unwrap();
    let settings_path = opts.settings_path.clone();
    let mut app = App::new(opts).unwrap();
    assert!(!app.content.actions().contains(&ContentAction::OpenBoxList));

    fs::write(&settings_path, "[panels]\nbox_list = true\n").unwrap();
    app.reload_settings();
    assert!(app.content.actions().contains(&ContentAction::OpenBoxList));

    // A broken file keeps what was loaded last.
    fs::write(&settings_path, "[panels\n").unwrap();
    app.reload_settings();
    assert!(app.content.actions().contains(&ContentAction::OpenBoxList));
}
