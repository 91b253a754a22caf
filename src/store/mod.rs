//! # Record store
//! Durable day-keyed snapshots, one JSON document per source.
//!
//! Document layout: `{ "records": [{ id, snapshot, createdAt, updatedAt }], "count": n }`.
//! Records are kept sorted by `id` and every mutation rewrites the whole file
//! (temp file + rename) before returning.

mod registry;

pub use registry::StoreRegistry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::StoreError;
use crate::stats::Snapshot;

/// One persisted observation per (source, day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub snapshot: Snapshot,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    count: usize,
}

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl RecordStore {
    /// Opens the document at `path`, creating an empty one if it does not
    /// exist yet. An existing document is never overwritten on open.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(raw) => {
                let mut doc: StoreDocument = serde_json::from_str(&raw)?;
                doc.records.sort_by(|a, b| a.id.cmp(&b.id));
                let loaded = doc.records.len();
                doc.records.dedup_by(|later, earlier| later.id == earlier.id);
                if doc.records.len() < loaded {
                    tracing::warn!(
                        path = %path.display(),
                        dropped = loaded - doc.records.len(),
                        "duplicate day keys in store, keeping the first of each"
                    );
                }
                doc.count = doc.records.len();
                Ok(Self { path, doc })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    doc: StoreDocument::default(),
                };
                store.persist()?;
                tracing::debug!(path = %store.path.display(), "created empty store");
                Ok(store)
            }
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    pub fn len(&self) -> usize {
        self.doc.count
    }

    pub fn is_empty(&self) -> bool {
        self.doc.records.is_empty()
    }

    pub fn find(&self, day: &str) -> Option<&Record> {
        self.position(day).ok().map(|i| &self.doc.records[i])
    }

    /// Inserts a new record for `day`. Fails with `DuplicateKey` if one exists.
    pub fn add(&mut self, day: &str, snapshot: Snapshot) -> Result<(), StoreError> {
        let idx = match self.position(day) {
            Ok(_) => return Err(StoreError::DuplicateKey(day.to_string())),
            Err(idx) => idx,
        };
        self.doc.records.insert(
            idx,
            Record {
                id: day.to_string(),
                snapshot,
                created_at: Utc::now(),
                updated_at: None,
            },
        );
        self.doc.count = self.doc.records.len();
        self.persist()
    }

    /// Replaces the snapshot of an existing record. Fails with `NotFound` otherwise.
    pub fn update(&mut self, day: &str, snapshot: Snapshot) -> Result<(), StoreError> {
        let idx = self
            .position(day)
            .map_err(|_| StoreError::NotFound(day.to_string()))?;
        let record = &mut self.doc.records[idx];
        record.snapshot = snapshot;
        record.updated_at = Some(Utc::now());
        self.persist()
    }

    /// All records, ascending by day. Call again to restart.
    pub fn scan_ascending(&self) -> impl Iterator<Item = &Record> + '_ {
        self.doc.records.iter()
    }

    fn position(&self, day: &str) -> Result<usize, usize> {
        self.doc.records.binary_search_by(|r| r.id.as_str().cmp(day))
    }

    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let bytes = serde_json::to_vec_pretty(&self.doc)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}
