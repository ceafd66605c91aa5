//! Two-level hash storage (hash name -> field -> value)

use super::memory::StoreMap;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Thread-safe map of hashes
///
/// Inner maps are created on the first field write, under the write lock.
/// A hash with no fields reads the same as one that was never written.
#[derive(Debug, Default)]
pub struct HashStore {
    data: RwLock<StoreMap<StoreMap<Bytes>>>,
}

impl HashStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` in the hash stored at `hash` to `value`
    pub fn set(&self, hash: impl Into<Bytes>, field: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.data
            .write()
            .entry(hash.into())
            .or_default()
            .insert(field.into(), value.into());
    }

    /// Get the value of a hash field
    pub fn get(&self, hash: &[u8], field: &[u8]) -> Option<Bytes> {
        self.data.read().get(hash)?.get(field).cloned()
    }

    /// All values of a hash, in no particular order
    ///
    /// Returns None if the hash does not exist.
    pub fn get_all(&self, hash: &[u8]) -> Option<Vec<Bytes>> {
        let data = self.data.read();
        let fields = data.get(hash).filter(|fields| !fields.is_empty())?;
        Some(fields.values().cloned().collect())
    }

    /// Number of hashes
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Ordered copy of the current contents
    pub fn snapshot(&self) -> BTreeMap<Bytes, BTreeMap<Bytes, Bytes>> {
        self.data
            .read()
            .iter()
            .map(|(hash, fields)| {
                let fields = fields
                    .iter()
                    .map(|(field, value)| (field.clone(), value.clone()))
                    .collect();
                (hash.clone(), fields)
            })
            .collect()
    }
}
