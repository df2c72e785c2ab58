#![allow(dead_code)]

use panelkit_ui::{MissingRowWidget, RowWidgets, StatsView};

#[derive(Clone, Debug, PartialEq)]
pub struct FakeRow {
    pub key: String,
    pub visible: bool,
    pub value: String,
    pub destroyed: bool,
}

/// Widget host that records every call so tests can inspect the result.
#[derive(Default, Debug)]
pub struct FakeHost {
    pub rows: Vec<FakeRow>,
    pub row_height: f32,
    /// Extra height per character of a row's value, for wrapping text.
    pub height_per_char: f32,
    /// Keys whose value widget is missing.
    pub broken: Vec<String>,
    pub visibility_calls: usize,
    pub value_calls: usize,
    pub header: (String, String),
    pub progress: (f32, String),
    pub flashes: usize,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            row_height: 36.0,
            ..Self::default()
        }
    }

    pub fn row(&self, key: &str) -> Option<&FakeRow> {
        self.rows.iter().find(|r| r.key == key && !r.destroyed)
    }

    pub fn visible_keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter(|r| r.visible && !r.destroyed)
            .map(|r| r.key.as_str())
            .collect()
    }
}

impl RowWidgets for FakeHost {
    type Handle = usize;

    fn create_row(&mut self, key: &str) -> usize {
        self.rows.push(FakeRow {
            key: key.to_string(),
            visible: false,
            value: String::new(),
            destroyed: false,
        });
        self.rows.len() - 1
    }

    fn set_row_visible(&mut self, row: usize, visible: bool) {
        self.visibility_calls += 1;
        self.rows[row].visible = visible;
    }

    fn set_row_value(&mut self, row: usize, key: &str, value: &str) -> Result<(), MissingRowWidget> {
        if self.broken.iter().any(|k| k == key) {
            return Err(MissingRowWidget {
                key: key.to_string(),
            });
        }
        self.value_calls += 1;
        self.rows[row].value = value.to_string();
        Ok(())
    }

    fn destroy_row(&mut self, row: usize) {
        self.rows[row].destroyed = true;
        self.rows[row].visible = false;
    }

    fn preferred_height(&self, row: usize) -> f32 {
        self.row_height + self.height_per_char * self.rows[row].value.chars().count() as f32
    }
}

impl StatsView for FakeHost {
    fn set_header(&mut self, name_line: &str, level_line: &str) {
        self.header = (name_line.to_string(), level_line.to_string());
    }

    fn set_progress(&mut self, fraction: f32, label: &str, flash: bool) {
        self.progress = (fraction, label.to_string());
        if flash {
            self.flashes += 1;
        }
    }
}
