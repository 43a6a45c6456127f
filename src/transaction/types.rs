/// Transaction type for the ledger
use crate::crypto::{KeyPair, PublicKey, Signature};
use crate::error::Result;
use crate::hasher::Hasher;
use crate::types::Hash;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Maximum payload size in bytes (100KB)
pub const MAX_TRANSACTION_SIZE: usize = 100_000;

/// A signed unit of opaque data.
///
/// The payload is fixed at construction. Signing and first-seen stamping do not
/// take part in the transaction hash, so the cached hash can never go stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "serde_bytes")]
    pub(crate) data: Vec<u8>,
    pub(crate) signer: Option<PublicKey>,
    pub(crate) signature: Option<Signature>,
    #[serde(skip)]
    pub(crate) hash: OnceCell<Hash>,
    /// Local observation time in nanoseconds; not part of the wire form.
    #[serde(skip)]
    pub(crate) first_seen: i64,
}

impl Transaction {
    pub fn new(data: Vec<u8>) -> Self {
        Transaction {
            data,
            signer: None,
            signature: None,
            hash: OnceCell::new(),
            first_seen: 0,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn signer(&self) -> Option<&PublicKey> {
        self.signer.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    pub fn first_seen(&self) -> i64 {
        self.first_seen
    }

    pub fn set_first_seen(&mut self, nanos: i64) {
        self.first_seen = nanos;
    }

    /// Signs the payload, replacing any earlier signer and signature.
    /// Oversized payloads are refused.
    pub fn sign(&mut self, keypair: &KeyPair) -> Result<()> {
        self.validate_size()?;
        let signature = keypair.sign(&self.data)?;
        self.signer = Some(keypair.public_key());
        self.signature = Some(signature);
        Ok(())
    }

    /// Computed on first call, then served from cache.
    pub fn hash<H: Hasher<Transaction>>(&self, hasher: &H) -> Hash {
        *self.hash.get_or_init(|| hasher.hash(self))
    }

    /// Canonical payload encoding: u32 little-endian length followed by the data.
    ///
    /// The prefix saturates at `u32::MAX`; such payloads are far above
    /// [`MAX_TRANSACTION_SIZE`] and never pass `verify`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = u32::try_from(self.data.len()).unwrap_or(u32::MAX);
        let mut buf = Vec::with_capacity(4 + self.data.len());
        buf.extend_from_slice(&len.to_le_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Canonical payload encoding followed by the signer and signature, each
    /// behind a presence byte. This is what a block's data hash commits to.
    pub fn signed_bytes(&self) -> Vec<u8> {
        let mut buf = self.to_bytes();
        match &self.signer {
            Some(signer) => {
                buf.push(1);
                buf.extend_from_slice(&signer.to_bytes());
            }
            None => buf.push(0),
        }
        match &self.signature {
            Some(signature) => {
                buf.push(1);
                buf.extend_from_slice(&signature.to_compact());
            }
            None => buf.push(0),
        }
        buf
    }
}
