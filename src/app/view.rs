use hashbrown::HashMap;
use panelkit_ui::{MissingRowWidget, RowWidgets, StatsView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowId(u32);

#[derive(Debug)]
struct HeadlessRow {
    key: String,
    value: String,
    visible: bool,
}

/// Widget host without a renderer: keeps what a real toolkit would display
/// and logs it.
#[derive(Debug)]
pub struct HeadlessView {
    rows: HashMap<RowId, HeadlessRow>,
    order: Vec<RowId>,
    next_id: u32,
    row_height: f32,
    header: (String, String),
    progress: (f32, String),
}

impl HeadlessView {
    pub fn new(row_height: f32) -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
            row_height,
            header: (String::new(), String::new()),
            progress: (0.0, String::new()),
        }
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .filter_map(|id| self.rows.get(id))
            .filter(|r| r.visible)
            .map(|r| (r.key.as_str(), r.value.as_str()))
    }

    pub fn live_rows(&self) -> usize {
        self.rows.len()
    }

    /// One-line summary of what the stats panel currently shows.
    pub fn describe(&self) -> String {
        let rows: Vec<String> = self
            .visible_rows()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!(
            "{} | {} | {} [{}]",
            self.header.0,
            self.header.1,
            self.progress.1,
            rows.join(", ")
        )
    }
}

impl RowWidgets for HeadlessView {
    type Handle = RowId;

    fn create_row(&mut self, key: &str) -> RowId {
        let id = RowId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.rows.insert(
            id,
            HeadlessRow {
                key: key.to_string(),
                value: String::new(),
                visible: false,
            },
        );
        self.order.push(id);
        log::debug!(target: "view", "row {:?} created for {:?}", id, key);
        id
    }

    fn set_row_visible(&mut self, row: RowId, visible: bool) {
        if let Some(r) = self.rows.get_mut(&row) {
            r.visible = visible;
        }
    }

    fn set_row_value(&mut self, row: RowId, key: &str, value: &str) -> Result<(), MissingRowWidget> {
        let r = self.rows.get_mut(&row).ok_or_else(|| MissingRowWidget {
            key: key.to_string(),
        })?;
        r.value.clear();
        r.value.push_str(value);
        Ok(())
    }

    fn destroy_row(&mut self, row: RowId) {
        self.rows.remove(&row);
        self.order.retain(|id| *id != row);
    }

    fn preferred_height(&self, row: RowId) -> f32 {
        if self.rows.contains_key(&row) {
            self.row_height
        } else {
            0.0
        }
    }
}

impl StatsView for HeadlessView {
    fn set_header(&mut self, name_line: &str, level_line: &str) {
        self.header = (name_line.to_string(), level_line.to_string());
    }

    fn set_progress(&mut self, fraction: f32, label: &str, flash: bool) {
        self.progress = (fraction, label.to_string());
        if flash {
            log::info!(target: "view", "progress flash: {}", label);
        }
    }
}
