//! Transaction pool: unconfirmed transactions waiting for a block

use crate::error::{LedgerError, Result};
use crate::hasher::TxHasher;
use crate::transaction::Transaction;
use crate::types::Hash;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct PooledTx {
    /// Insertion order, used to break first-seen ties.
    seq: u64,
    tx: Transaction,
}

#[derive(Debug, Default)]
struct PoolInner {
    transactions: HashMap<Hash, PooledTx>,
    next_seq: u64,
}

/// Deduplicating pool keyed by transaction hash. Safe to share between
/// submitters and the block assembler.
#[derive(Debug, Default)]
pub struct TxPool {
    inner: RwLock<PoolInner>,
    /// 0 means unbounded.
    max_transactions: usize,
}

impl TxPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool that refuses new transactions once it holds `max_transactions`. Zero means unbounded.
    pub fn with_capacity(max_transactions: usize) -> Self {
        TxPool {
            inner: RwLock::new(PoolInner::default()),
            max_transactions,
        }
    }

    /// Adding a transaction that is already pooled is a no-op.
    pub fn add(&self, tx: Transaction) -> Result<()> {
        tx.validate_size()?;
        let hash = tx.hash(&TxHasher);
        let mut inner = self.inner.write();

        if inner.transactions.contains_key(&hash) {
            return Ok(());
        }
        if self.max_transactions > 0 && inner.transactions.len() >= self.max_transactions {
            return Err(LedgerError::MempoolFull(self.max_transactions));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.transactions.insert(hash, PooledTx { seq, tx });
        Ok(())
    }

    pub fn has(&self, hash: &Hash) -> bool {
        self.inner.read().transactions.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.inner.read().transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the pool ordered by first-seen time, oldest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        let inner = self.inner.read();
        let mut pooled: Vec<&PooledTx> = inner.transactions.values().collect();
        pooled.sort_by_key(|p| (p.tx.first_seen(), p.seq));
        pooled.into_iter().map(|p| p.tx.clone()).collect()
    }

    /// Evict a single transaction, e.g. once it has been included in a block.
    pub fn remove(&self, hash: &Hash) -> Option<Transaction> {
        self.inner
            .write()
            .transactions
            .remove(hash)
            .map(|pooled| pooled.tx)
    }

    pub fn flush(&self) {
        self.inner.write().transactions.clear();
    }
}
