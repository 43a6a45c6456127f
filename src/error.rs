//! Error types for the ledger core

use crate::types::Hash;
use thiserror::Error;

/// The kind of signed artifact an authenticity error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Transaction,
    Block,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::Transaction => write!(f, "transaction"),
            Artifact::Block => write!(f, "block"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{0} has no signature")]
    MissingSignature(Artifact),

    #[error("{0} has an invalid signature")]
    InvalidSignature(Artifact),

    #[error("chain already contains block ({height}) with hash ({hash})")]
    DuplicateBlock { height: u32, hash: Hash },

    #[error("block ({hash}) at height {height} is out of sequence, expected height {expected}")]
    OutOfSequenceHeight { height: u32, expected: u32, hash: Hash },

    #[error("the hash of the previous block ({got}) is invalid, expected ({expected})")]
    InvalidPreviousHash { expected: Hash, got: Hash },

    #[error("given height ({requested}) too high, current height is {current}")]
    HeightTooHigh { requested: u32, current: u32 },

    #[error("given bytes with length {got} should be {expected}")]
    MalformedAddressOrHash { expected: usize, got: usize },

    #[error("key generation failed: {0}")]
    KeyGenerationFailure(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("block data hash ({got}) does not match its transactions ({expected})")]
    DataHashMismatch { expected: Hash, got: Hash },

    #[error("transaction too large: {size} bytes (max: {max})")]
    TransactionTooLarge { size: usize, max: usize },

    #[error("no block can follow height {0}")]
    HeightOverflow(u32),

    #[error("transaction pool is full ({0} transactions)")]
    MempoolFull(usize),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Codec(err.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for LedgerError {
    fn from(err: Box<bincode::ErrorKind>) -> Self {
        LedgerError::Codec(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
