//! The document library: per-document metadata and reading positions over a
//! plain key-value persistence service.
//!
//! Two logical tables share the store: the index (one JSON array of
//! entries) and one text blob per document. There is no transaction across
//! them; a caller must tolerate one write landing while the other fails.
//! Reads always degrade to empty defaults and position writes are logged
//! and swallowed, so a broken store never blocks a reading session.

use crate::extract::{ExtractionMetadata, FileKind};
use crate::position::ReadingPosition;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Minimal persistence contract: string keys, string values. Values are
/// JSON blobs; the store itself knows nothing about their shape.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str);
}

/// File-backed store: one file per key under a root directory, named by the
/// Sha256 of the key so arbitrary keys map to safe filenames.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        self.root.join(format!("{:x}.json", hasher.finalize()))
    }
}

impl KeyValueStore for FsStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove(&self, key: &str) {
        let _ = fs::remove_file(self.path_for(key));
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: std::sync::Mutex<std::collections::HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map
            .lock()
            .map_err(|_| anyhow::anyhow!("store poisoned"))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.map.lock() {
            map.remove(key);
        }
    }
}

/// One stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub kind: FileKind,
    /// Unix seconds.
    pub date_added: u64,
    pub last_read: Option<u64>,
    pub reading_position: Option<ReadingPosition>,
    pub current_section: usize,
    pub metadata: ExtractionMetadata,
}

/// Approximate bytes held in the store on our behalf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageUsage {
    pub index_bytes: usize,
    pub text_bytes: usize,
}

/// Versioned namespace prefixing every key this library writes, so an
/// incompatible future layout can move to `.v2` without colliding.
pub const DEFAULT_NAMESPACE: &str = "bionic-reader.v1";

pub struct Library<S: KeyValueStore> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(store: S, namespace: &str) -> Self {
        Self {
            store,
            namespace: namespace.to_string(),
        }
    }

    fn index_key(&self) -> String {
        format!("{}/index", self.namespace)
    }

    fn text_key(&self, id: &str) -> String {
        format!("{}/text/{}", self.namespace, id)
    }

    /// All stored entries. Any read or parse failure degrades to empty.
    pub fn entries(&self) -> Vec<LibraryEntry> {
        let Some(raw) = self.store.get(&self.index_key()) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Corrupt library index, starting empty: {err}");
                Vec::new()
            }
        }
    }

    pub fn entry(&self, id: &str) -> Option<LibraryEntry> {
        self.entries().into_iter().find(|entry| entry.id == id)
    }

    pub fn document_text(&self, id: &str) -> Option<String> {
        let raw = self.store.get(&self.text_key(id))?;
        match serde_json::from_str(&raw) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(id, "Corrupt stored text: {err}");
                None
            }
        }
    }

    /// Store a new document and its text, returning the generated id.
    ///
    /// The index and the text blob are separate writes; if the second fails
    /// the entry stays listed without text, which readers must tolerate.
    pub fn save_document(
        &self,
        name: &str,
        size: u64,
        kind: FileKind,
        metadata: ExtractionMetadata,
        text: &str,
    ) -> Result<String> {
        let id = generate_id(name, size);
        let entry = LibraryEntry {
            id: id.clone(),
            name: name.to_string(),
            size,
            kind,
            date_added: now_unix(),
            last_read: None,
            reading_position: None,
            current_section: 0,
            metadata,
        };

        let mut entries = self.entries();
        entries.push(entry);
        self.write_index(&entries)?;

        let blob = serde_json::to_string(text).context("Failed to serialize document text")?;
        self.store
            .set(&self.text_key(&id), &blob)
            .context("Failed to store document text")?;
        debug!(%id, name, "Stored document in library");
        Ok(id)
    }

    /// Remove an entry and its text. Returns whether the entry existed.
    pub fn delete(&self, id: &str) -> bool {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return false;
        }
        if let Err(err) = self.write_index(&entries) {
            warn!(id, "Failed to update index on delete: {err}");
            return false;
        }
        self.store.remove(&self.text_key(id));
        true
    }

    /// Record where the reader is. Best-effort: failures are logged and the
    /// session continues with its in-memory position.
    pub fn update_position(&self, id: &str, position: ReadingPosition, section_index: usize) {
        let mut entries = self.entries();
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            debug!(id, "No library entry to update position for");
            return;
        };
        entry.reading_position = Some(position);
        entry.current_section = section_index;
        entry.last_read = Some(now_unix());
        if let Err(err) = self.write_index(&entries) {
            warn!(id, "Failed to persist reading position: {err}");
        }
    }

    pub fn storage_usage(&self) -> StorageUsage {
        let index = self.store.get(&self.index_key()).unwrap_or_default();
        let text_bytes = self
            .entries()
            .iter()
            .filter_map(|entry| self.store.get(&self.text_key(&entry.id)))
            .map(|blob| blob.len())
            .sum();
        StorageUsage {
            index_bytes: index.len(),
            text_bytes,
        }
    }

    fn write_index(&self, entries: &[LibraryEntry]) -> Result<()> {
        let blob = serde_json::to_string(entries).context("Failed to serialize library index")?;
        self.store
            .set(&self.index_key(), &blob)
            .context("Failed to store library index")
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn generate_id(name: &str, size: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(size.to_le_bytes());
    hasher.update(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
            .to_le_bytes(),
    );
    let hash = format!("{:x}", hasher.finalize());
    hash[..16].to_string()
}
