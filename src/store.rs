//! Entry persistence
//!
//! The analytics functions never touch a store; callers load a snapshot and
//! pass `&[Entry]` down. Only the CLI appends.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::models::Entry;

/// Source of truth for logged entries
pub trait EntryStore {
    /// Every stored entry, in storage order
    fn load(&self) -> Result<Vec<Entry>>;

    /// Validate and persist one new entry
    fn append(&self, entry: Entry) -> Result<()>;
}

/// Entries kept as a pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(())
    }
}

impl EntryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Entry>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No entry file yet");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;

        let entries: Vec<Entry> =
            serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        validate_all(&entries)?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Loaded entries");
        Ok(entries)
    }

    fn append(&self, entry: Entry) -> Result<()> {
        let entry = entry.normalize();
        entry.validate()?;

        let mut entries = self.load()?;
        entries.push(entry);
        self.save(&entries)?;

        tracing::info!(path = %self.path.display(), entries = entries.len(), "Entry saved");
        Ok(())
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<Vec<Entry>>,
}

impl MemoryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        MemoryStore {
            entries: RefCell::new(entries),
        }
    }
}

impl EntryStore for MemoryStore {
    fn load(&self) -> Result<Vec<Entry>> {
        let entries = self.entries.borrow().clone();
        validate_all(&entries)?;
        Ok(entries)
    }

    fn append(&self, entry: Entry) -> Result<()> {
        let entry = entry.normalize();
        entry.validate()?;
        self.entries.borrow_mut().push(entry);
        Ok(())
    }
}

fn validate_all(entries: &[Entry]) -> Result<()> {
    for (index, entry) in entries.iter().enumerate() {
        entry.validate().map_err(|e| StoreError::InvalidRecord {
            index,
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Entries newest first; entries sharing a date keep their stored order
pub fn sorted_by_date_desc(entries: &[Entry]) -> Vec<&Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Entry at `index` in the newest-first ordering
pub fn entry_at(entries: &[Entry], index: usize) -> Option<&Entry> {
    sorted_by_date_desc(entries).get(index).copied()
}
