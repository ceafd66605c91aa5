//! Flat key/value storage

use bytes::Bytes;
use parking_lot::RwLock;
use siphasher::sip::SipHasher13;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasherDefault;

/// Hash map keyed by raw bytes, hashed with SipHash-1-3
pub(crate) type StoreMap<V> = HashMap<Bytes, V, BuildHasherDefault<SipHasher13>>;

/// Thread-safe key -> value map
///
/// Last writer wins. A missing key is distinct from a key holding the empty
/// string.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    data: RwLock<StoreMap<Bytes>>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        KeyValueStore {
            data: RwLock::new(StoreMap::with_capacity_and_hasher(
                capacity,
                BuildHasherDefault::<SipHasher13>::default(),
            )),
        }
    }

    /// Set a key to a value, overwriting any previous value
    pub fn set(&self, key: impl Into<Bytes>, value: impl Into<Bytes>) {
        self.data.write().insert(key.into(), value.into());
    }

    /// Get the value of a key
    pub fn get(&self, key: &[u8]) -> Option<Bytes> {
        self.data.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Ordered copy of the current contents
    pub fn snapshot(&self) -> BTreeMap<Bytes, Bytes> {
        self.data
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}
