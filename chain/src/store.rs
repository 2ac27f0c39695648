use std::collections::HashMap;

use nipopow_hash::Hash32;
use nipopow_primitives::Block;

use crate::chain_data::ChainData;

/// Mapping from block hash to [`ChainData`].
///
/// Volatile: lifetime bounded by the owning `ChainEngine`.
/// Only ever touched from within a serialized mutating operation or a read
/// snapshot, so no locking is done inside the store itself.
#[derive(Default)]
pub struct ChainStore {
    entries: HashMap<Hash32, ChainData>,
}

impl ChainStore {
    pub fn new() -> Self {
        ChainStore::default()
    }

    pub fn get(&self, hash: &Hash32) -> Option<ChainData> {
        self.entries.get(hash).cloned()
    }

    pub fn get_block(&self, hash: &Hash32) -> Option<Block> {
        self.get(hash).map(|data| data.head)
    }

    /// Idempotent for equal values; always overwrites with the latest write.
    pub fn put(&mut self, hash: Hash32, data: ChainData) {
        self.entries.insert(hash, data);
    }

    pub fn truncate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nipopow_primitives::Block;

    #[test]
    fn put_then_get_round_trips() {
        let mut store = ChainStore::new();
        let block = Block::genesis();
        let hash = block.hash();
        store.put(hash, ChainData::extendable(block.clone(), 1, 1, true));
        let data = store.get(&hash).unwrap();
        assert_eq!(data.head, block);
        assert!(data.on_main_chain);
    }

    #[test]
    fn put_is_idempotent_for_equal_values() {
        let mut store = ChainStore::new();
        let block = Block::genesis();
        let hash = block.hash();
        let data = ChainData::extendable(block, 1, 1, true);
        store.put(hash, data.clone());
        store.put(hash, data.clone());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn truncate_removes_everything() {
        let mut store = ChainStore::new();
        let block = Block::genesis();
        store.put(block.hash(), ChainData::extendable(block, 1, 1, true));
        store.truncate();
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_hash_returns_none() {
        let store = ChainStore::new();
        assert!(store.get(&Hash32::default()).is_none());
    }
}
