//! Block storage backends

use crate::block::Block;
use crate::error::{LedgerError, Result};
use crate::hasher::BlockHasher;
use crate::types::Hash;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Abstraction for block stores, keyed by block hash.
/// Writing the same block twice must be harmless.
pub trait Storage: Send + Sync {
    fn put(&self, block: &Block) -> Result<()>;
    fn get(&self, hash: &Hash) -> Result<Option<Block>>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Simple in-memory store useful for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    blocks: RwLock<HashMap<Hash, Block>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn put(&self, block: &Block) -> Result<()> {
        let hash = block.hash(&BlockHasher);
        if hash.is_zero() {
            return Err(LedgerError::Storage(format!(
                "refusing to store block {} under a zero hash",
                block.height()
            )));
        }
        self.blocks.write().insert(hash, block.clone());
        Ok(())
    }

    fn get(&self, hash: &Hash) -> Result<Option<Block>> {
        Ok(self.blocks.read().get(hash).cloned())
    }

    fn len(&self) -> usize {
        self.blocks.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::HEADER_VERSION;

    #[test]
    fn test_put_is_idempotent() {
        let store = MemoryStorage::new();
        let block = Block::genesis(HEADER_VERSION);

        store.put(&block).unwrap();
        store.put(&block).unwrap();

        assert_eq!(store.len(), 1);
        let stored = store.get(&block.hash(&BlockHasher)).unwrap().unwrap();
        assert_eq!(stored.header(), block.header());
    }

    #[test]
    fn test_get_missing_block() {
        let store = MemoryStorage::new();
        assert!(store.is_empty());
        assert!(store.get(&Hash::random()).unwrap().is_none());
    }
}
