use std::collections::HashMap;
use std::path::PathBuf;

use super::RecordStore;
use crate::error::StoreError;

/// Open stores keyed by source id, rooted at one data directory.
///
/// Owned by the caller for the lifetime of the process and passed down the
/// pipeline; each source id maps to `<root>/<id>.json`.
#[derive(Debug)]
pub struct StoreRegistry {
    root: PathBuf,
    stores: HashMap<String, RecordStore>,
}

impl StoreRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            stores: HashMap::new(),
        }
    }

    /// Returns the store for `source_id`, opening it on first use.
    pub fn open(&mut self, source_id: &str) -> Result<&mut RecordStore, StoreError> {
        if !self.stores.contains_key(source_id) {
            let store = RecordStore::open(self.path_for(source_id))?;
            self.stores.insert(source_id.to_string(), store);
        }
        self.stores
            .get_mut(source_id)
            .ok_or_else(|| StoreError::NotFound(source_id.to_string()))
    }

    pub fn path_for(&self, source_id: &str) -> PathBuf {
        self.root.join(format!("{source_id}.json"))
    }
}
