use std::fmt::Debug;

use hashbrown::HashMap;
use thiserror::Error;

/// The row's value widget could not be found; only that row's update is
/// skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row widget for {key:?} is missing")]
pub struct MissingRowWidget {
    pub key: String,
}

/// Host-side widget operations needed by [`RowPool`]. Rows are appended in
/// creation order; the host never reorders them.
pub trait RowWidgets {
    type Handle: Copy + Debug;

    fn create_row(&mut self, key: &str) -> Self::Handle;
    fn set_row_visible(&mut self, row: Self::Handle, visible: bool);
    fn set_row_value(
        &mut self,
        row: Self::Handle,
        key: &str,
        value: &str,
    ) -> Result<(), MissingRowWidget>;
    fn destroy_row(&mut self, row: Self::Handle);
    fn preferred_height(&self, row: Self::Handle) -> f32;
}

#[derive(Clone, Debug)]
pub struct RowEntry<H> {
    pub key: String,
    pub widget: H,
    pub visible: bool,
    seen_cycle: u64,
}

/// What a reconcile pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: usize,
    pub shown: usize,
    pub hidden: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl ReconcileReport {
    /// Whether the visible row set changed, which invalidates the panel's
    /// measured height.
    #[inline]
    pub fn visibility_changed(&self) -> bool {
        self.created + self.shown + self.hidden > 0
    }

    pub fn merge(&mut self, other: &ReconcileReport) {
        self.created += other.created;
        self.shown += other.shown;
        self.hidden += other.hidden;
        self.updated += other.updated;
        self.skipped += other.skipped;
    }
}

/// Arena of keyed rows. Entries are never removed while the panel lives;
/// rows absent from a snapshot are hidden and reused when they come back.
#[derive(Debug)]
pub struct RowPool<H> {
    entries: Vec<RowEntry<H>>,
    index: HashMap<String, usize>,
    cycle: u64,
}

impl<H> Default for RowPool<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            cycle: 0,
        }
    }
}

impl<H: Copy + Debug> RowPool<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes exactly the rows in `rows` visible, in first-seen order, and
    /// writes their values.
    pub fn reconcile<I, K, V, W>(&mut self, rows: I, widgets: &mut W) -> ReconcileReport
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        W: RowWidgets<Handle = H> + ?Sized,
    {
        self.cycle = self.cycle.wrapping_add(1);
        let cycle = self.cycle;
        let mut report = ReconcileReport::default();

        for (key, value) in rows {
            let key = key.as_ref();
            let idx = match self.index.get(key) {
                Some(&idx) => {
                    let entry = &mut self.entries[idx];
                    if !entry.visible {
                        widgets.set_row_visible(entry.widget, true);
                        entry.visible = true;
                        report.shown += 1;
                    }
                    idx
                }
                None => {
                    let widget = widgets.create_row(key);
                    widgets.set_row_visible(widget, true);
                    let idx = self.entries.len();
                    self.entries.push(RowEntry {
                        key: key.to_string(),
                        widget,
                        visible: true,
                        seen_cycle: cycle,
                    });
                    self.index.insert(key.to_string(), idx);
                    report.created += 1;
                    log::trace!(target: "rows", "created row {key:?} at {idx}");
                    idx
                }
            };
            let entry = &mut self.entries[idx];
            entry.seen_cycle = cycle;
            match widgets.set_row_value(entry.widget, key, value.as_ref()) {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    log::warn!("skipping value update: {e}");
                    report.skipped += 1;
                }
            }
        }

        for entry in &mut self.entries {
            if entry.visible && entry.seen_cycle != cycle {
                widgets.set_row_visible(entry.widget, false);
                entry.visible = false;
                report.hidden += 1;
            }
        }

        log::trace!(target: "rows", "reconcile {:?}", report);
        report
    }

    /// Hides every row; the pool keeps its entries.
    pub fn hide_all<W>(&mut self, widgets: &mut W) -> usize
    where
        W: RowWidgets<Handle = H> + ?Sized,
    {
        let mut hidden = 0;
        for entry in self.entries.iter_mut().filter(|e| e.visible) {
            widgets.set_row_visible(entry.widget, false);
            entry.visible = false;
            hidden += 1;
        }
        hidden
    }

    /// Destroys every pooled row. Only for teardown.
    pub fn clear<W>(&mut self, widgets: &mut W)
    where
        W: RowWidgets<Handle = H> + ?Sized,
    {
        for entry in self.entries.drain(..) {
            widgets.destroy_row(entry.widget);
        }
        self.index.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RowEntry<H>> {
        self.index.get(key).map(|&idx| &self.entries[idx])
    }

    /// Entries in visual order.
    pub fn iter(&self) -> impl Iterator<Item = &RowEntry<H>> {
        self.entries.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &RowEntry<H>> {
        self.entries.iter().filter(|e| e.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Host {
        rows: Vec<(String, bool, String)>,
        destroyed: usize,
        broken: Option<usize>,
    }

    impl RowWidgets for Host {
        type Handle = usize;

        fn create_row(&mut self, key: &str) -> usize {
            self.rows.push((key.to_string(), false, String::new()));
            self.rows.len() - 1
        }

        fn set_row_visible(&mut self, row: usize, visible: bool) {
            self.rows[row].1 = visible;
        }

        fn set_row_value(&mut self, row: usize, key: &str, value: &str) -> Result<(), MissingRowWidget> {
            if self.broken == Some(row) {
                return Err(MissingRowWidget { key: key.to_string() });
            }
            self.rows[row].2 = value.to_string();
            Ok(())
        }

        fn destroy_row(&mut self, _row: usize) {
            self.destroyed += 1;
        }

        fn preferred_height(&self, _row: usize) -> f32 {
            36.0
        }
    }

    #[test]
    fn absent_rows_are_hidden_then_reused() {
        let mut host = Host::default();
        let mut pool = RowPool::new();
        let report = pool.reconcile([("Health", "100"), ("Haste", "5%")], &mut host);
        assert_eq!(report.created, 2);
        let report = pool.reconcile([("Health", "120")], &mut host);
        assert_eq!(report.hidden, 1);
        assert!(!pool.get("Haste").unwrap().visible);
        assert_eq!(pool.len(), 2);
        let report = pool.reconcile([("Health", "120"), ("Haste", "7%")], &mut host);
        assert_eq!(report.created, 0);
        assert_eq!(report.shown, 1);
        assert_eq!(host.rows.len(), 2);
        assert_eq!(host.rows[1], ("Haste".to_string(), true, "7%".to_string()));
    }

    #[test]
    fn missing_widget_skips_only_that_row() {
        let mut host = Host {
            broken: Some(0),
            ..Host::default()
        };
        let mut pool = RowPool::new();
        let report = pool.reconcile([("Health", "1"), ("Spell Power", "2")], &mut host);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.updated, 1);
        assert!(pool.get("Health").unwrap().visible);
        assert_eq!(host.rows[1].2, "2");
    }

    #[test]
    fn clear_destroys_every_row() {
        let mut host = Host::default();
        let mut pool = RowPool::new();
        pool.reconcile([("a", "1"), ("b", "2")], &mut host);
        pool.reconcile([("a", "1")], &mut host);
        pool.clear(&mut host);
        assert_eq!(host.destroyed, 2);
        assert!(pool.is_empty());
        assert!(pool.get("a").is_none());
    }

    #[test]
    fn hide_all_keeps_entries() {
        let mut host = Host::default();
        let mut pool = RowPool::new();
        pool.reconcile([("a", "1"), ("b", "2")], &mut host);
        assert_eq!(pool.hide_all(&mut host), 2);
        assert_eq!(pool.visible_count(), 0);
        assert_eq!(pool.len(), 2);
    }
}
