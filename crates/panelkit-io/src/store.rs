use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("malformed store file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot encode store: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Sectioned string key-value store. Reads are local and synchronous.
pub trait KeyValueStore {
    fn get(&self, section: &str, key: &str) -> Option<String>;
    fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError>;
}

type Sections = BTreeMap<String, BTreeMap<String, String>>;

/// In-memory store; counts writes so callers can observe persistence.
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    sections: Sections,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, section: &str, key: &str, value: &str) -> Self {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Number of `set` calls since construction.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes += 1;
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one TOML table per section, every value a string.
/// Each `set` writes the whole file through.
#[derive(Debug)]
pub struct TomlFileStore {
    path: PathBuf,
    sections: Sections,
}

impl TomlFileStore {
    /// Opens `path`; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let sections = match fs::read_to_string(&path) {
            Ok(text) => Self::parse(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Sections::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        Ok(Self { path, sections })
    }

    /// Like [`TomlFileStore::open`], but a corrupt file is replaced by an empty
    /// store on the next write instead of failing.
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                log::warn!("store {} unusable ({}); starting empty", path.display(), e);
                Self {
                    path: path.to_path_buf(),
                    sections: Sections::new(),
                }
            }
        }
    }

    pub fn parse(text: &str) -> Result<Sections, StoreError> {
        Ok(toml::from_str(text)?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let text = toml::to_string(&self.sections)?;
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl TomlFileStore {
    fn rollback(&mut self, section: &str, key: &str, previous: Option<String>) {
        let Some(entries) = self.sections.get_mut(section) else {
            return;
        };
        match previous {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
                if entries.is_empty() {
                    self.sections.remove(section);
                }
            }
        }
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, section: &str, key: &str) -> Option<String> {
        self.sections.get(section)?.get(key).cloned()
    }

    fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self
            .sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        if previous.as_deref() == Some(value) {
            return Ok(());
        }
        log::debug!(target: "store", "[{}] {} = {:?}", section, key, value);
        if let Err(e) = self.flush() {
            // Keep memory in step with the file.
            self.rollback(section, key, previous);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("Panels", "Base"), None);
        store.set("Panels", "Base", "a").unwrap();
        store.set("Panels", "Base", "b").unwrap();
        assert_eq!(store.get("Panels", "Base").as_deref(), Some("b"));
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn sections_are_independent() {
        let store = MemoryStore::new()
            .with_entry("Panels", "Base", "x")
            .with_entry("UISettings", "Base", "y");
        assert_eq!(store.get("Panels", "Base").as_deref(), Some("x"));
        assert_eq!(store.get("UISettings", "Base").as_deref(), Some("y"));
    }

    #[test]
    fn parse_rejects_non_string_values() {
        assert!(TomlFileStore::parse("[Panels]\nBase = 3\n").is_err());
    }
}
