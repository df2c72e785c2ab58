mod common;

use common::FakeHost;
use panelkit_ui::{RowPool, StatSnapshot};
use proptest::prelude::*;

fn snapshot(health: i64, dynamic: &[(&str, &str)]) -> StatSnapshot {
    StatSnapshot {
        max_health: health,
        dynamic_stats: dynamic
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        ..StatSnapshot::default()
    }
}

#[test]
fn absent_key_is_hidden_not_destroyed() {
    let mut host = FakeHost::new();
    let mut pool = RowPool::new();
    pool.reconcile(snapshot(5000, &[("Str", "10")]).rows(), &mut host);
    pool.reconcile(snapshot(5100, &[]).rows(), &mut host);

    let health = pool.get("Health").unwrap();
    assert!(health.visible);
    assert_eq!(host.row("Health").unwrap().value, "5100");

    let str_row = pool.get("Str").unwrap();
    assert!(!str_row.visible);
    assert!(!host.row("Str").unwrap().visible);
    assert_eq!(pool.len(), 4);
}

#[test]
fn identical_snapshot_changes_nothing() {
    let mut host = FakeHost::new();
    let mut pool = RowPool::new();
    let s = snapshot(1800, &[("Str", "10"), ("Haste", "3%")]);
    pool.reconcile(s.rows(), &mut host);
    let rows_before = host.rows.clone();
    let calls_before = host.visibility_calls;

    let report = pool.reconcile(s.rows(), &mut host);
    assert!(!report.visibility_changed());
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 5);
    assert_eq!(host.rows, rows_before);
    assert_eq!(host.visibility_calls, calls_before);
}

#[test]
fn new_keys_append_in_first_seen_order() {
    let mut host = FakeHost::new();
    let mut pool = RowPool::new();
    pool.reconcile(snapshot(1, &[("B", "1")]).rows(), &mut host);
    pool.reconcile(snapshot(1, &[("A", "2"), ("B", "3")]).rows(), &mut host);
    let keys: Vec<&str> = pool.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, ["Health", "Physical Power", "Spell Power", "B", "A"]);
    assert_eq!(
        host.visible_keys(),
        ["Health", "Physical Power", "Spell Power", "B", "A"]
    );
}

#[test]
fn missing_value_widget_does_not_abort_reconcile() {
    let mut host = FakeHost::new();
    host.broken.push("Physical Power".into());
    let mut pool = RowPool::new();
    let report = pool.reconcile(snapshot(1200, &[("Str", "9")]).rows(), &mut host);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.updated, 4);
    assert_eq!(host.row("Str").unwrap().value, "9");
    assert!(pool.get("Physical Power").unwrap().visible);
}

fn key_sets() -> impl Strategy<Value = Vec<Vec<(String, String)>>> {
    let key = prop::sample::select(vec!["Str", "Agi", "Int", "Haste", "Crit", "Leech"]);
    let snap = prop::collection::vec((key, 0u32..1000), 0..6).prop_map(|pairs| {
        let mut seen = Vec::<(String, String)>::new();
        for (k, v) in pairs {
            if !seen.iter().any(|(s, _)| s == k) {
                seen.push((k.to_string(), v.to_string()));
            }
        }
        seen
    });
    prop::collection::vec(snap, 1..20)
}

proptest! {
    #[test]
    fn pool_only_grows_and_keeps_every_seen_key(sequence in key_sets()) {
        let mut host = FakeHost::new();
        let mut pool = RowPool::new();
        let mut seen: Vec<String> = Vec::new();
        let mut last_len = 0;
        for dynamic in sequence {
            let s = StatSnapshot { dynamic_stats: dynamic.clone(), ..StatSnapshot::default() };
            pool.reconcile(s.rows(), &mut host);
            for (k, _) in &dynamic {
                if !seen.contains(k) {
                    seen.push(k.clone());
                }
            }
            prop_assert!(pool.len() >= last_len);
            last_len = pool.len();
            for k in &seen {
                prop_assert!(pool.get(k).is_some());
            }
            for entry in pool.iter() {
                let expected = dynamic.iter().any(|(k, _)| *k == entry.key)
                    || panelkit_ui::stats::FIXED_KEYS.contains(&entry.key.as_str());
                prop_assert_eq!(entry.visible, expected);
            }
            // One widget per key, ever.
            prop_assert_eq!(host.rows.len(), pool.len());
        }
    }
}
