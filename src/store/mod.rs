//! In-memory storage module
//!
//! Provides the core data structures for storing key-value pairs in memory.
//! This module is independent of protocol and command handling (loose coupling).

mod hash;
mod memory;

pub use hash::HashStore;
pub use memory::KeyValueStore;

/// All the data owned by one interpreter: flat keys and hashes
///
/// The two maps are independent: a key and a hash may share a name.
#[derive(Debug, Default)]
pub struct Store {
    strings: KeyValueStore,
    hashes: HashStore,
}

impl Store {
    pub fn new() -> Self {
        Store {
            strings: KeyValueStore::new(),
            hashes: HashStore::new(),
        }
    }

    pub fn strings(&self) -> &KeyValueStore {
        &self.strings
    }

    pub fn hashes(&self) -> &HashStore {
        &self.hashes
    }
}
