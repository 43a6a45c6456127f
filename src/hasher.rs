//! Pluggable content hashing over canonical byte encodings

use crate::block::Header;
use crate::transaction::Transaction;
use crate::types::Hash;
use sha2::{Digest, Sha256};

/// Anything able to digest a `T` into a [`Hash`].
pub trait Hasher<T: ?Sized> {
    fn hash(&self, item: &T) -> Hash;
}

/// Header hashing: links blocks together and identifies the ledger tip.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockHasher;

impl Hasher<Header> for BlockHasher {
    fn hash(&self, header: &Header) -> Hash {
        Hash::new(Sha256::digest(header.to_bytes()).into())
    }
}

/// Transaction hashing: the mempool's dedup key.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxHasher;

impl Hasher<Transaction> for TxHasher {
    fn hash(&self, tx: &Transaction) -> Hash {
        Hash::new(Sha256::digest(tx.to_bytes()).into())
    }
}
