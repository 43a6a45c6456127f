//! Fixed-size primitives shared by every layer of the ledger

use crate::error::LedgerError;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HASH_LENGTH: usize = 32;
pub const ADDRESS_LENGTH: usize = 28;

/// A 32-byte content digest. The all-zero value means "not computed yet".
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash([u8; HASH_LENGTH]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_LENGTH]) -> Self {
        Hash(bytes)
    }

    /// Builds a hash from a slice that must be exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let value: [u8; HASH_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| LedgerError::MalformedAddressOrHash {
                    expected: HASH_LENGTH,
                    got: bytes.len(),
                })?;
        Ok(Hash(value))
    }

    pub fn random() -> Self {
        let mut value = [0u8; HASH_LENGTH];
        rand::thread_rng().fill_bytes(&mut value);
        Hash(value)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<[u8; HASH_LENGTH]> for Hash {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Hash(bytes)
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self)
    }
}

/// A 28-byte account identifier derived from a public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Builds an address from a slice that must be exactly 28 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let value: [u8; ADDRESS_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| LedgerError::MalformedAddressOrHash {
                    expected: ADDRESS_LENGTH,
                    got: bytes.len(),
                })?;
        Ok(Address(value))
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Returns `size` bytes from the thread-local RNG.
pub fn random_bytes(size: usize) -> Vec<u8> {
    let mut token = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut token);
    token
}

/// Current wall-clock time in nanoseconds since the Unix epoch.
pub fn unix_nanos() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}
