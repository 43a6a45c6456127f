//! Blocks and their headers

use crate::crypto::{KeyPair, PublicKey, Signature};
use crate::error::{Artifact, LedgerError, Result};
use crate::hasher::{BlockHasher, Hasher};
use crate::transaction::Transaction;
use crate::types::{Hash, HASH_LENGTH};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};

pub const HEADER_VERSION: u32 = 1;

/// Size of the canonical header encoding.
pub const HEADER_SIZE: usize = 4 + HASH_LENGTH + HASH_LENGTH + 8 + 4;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    pub data_hash: Hash,
    pub prev_block_hash: Hash,
    pub timestamp: u64,
    pub height: u32,
}

impl Header {
    /// Canonical little-endian encoding. Hashing and signing both run over these bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(self.data_hash.as_bytes());
        buf.extend_from_slice(self.prev_block_hash.as_bytes());
        buf.extend_from_slice(&self.timestamp.to_le_bytes());
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf
    }

    pub fn encode_binary<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn decode_binary<R: Read + ?Sized>(reader: &mut R) -> Result<Header> {
        let mut buf = [0u8; HEADER_SIZE];
        reader.read_exact(&mut buf)?;

        let mut u32_bytes = [0u8; 4];
        let mut u64_bytes = [0u8; 8];

        u32_bytes.copy_from_slice(&buf[0..4]);
        let version = u32::from_le_bytes(u32_bytes);
        let data_hash = Hash::from_bytes(&buf[4..36])?;
        let prev_block_hash = Hash::from_bytes(&buf[36..68])?;
        u64_bytes.copy_from_slice(&buf[68..76]);
        let timestamp = u64::from_le_bytes(u64_bytes);
        u32_bytes.copy_from_slice(&buf[76..80]);
        let height = u32::from_le_bytes(u32_bytes);

        Ok(Header {
            version,
            data_hash,
            prev_block_hash,
            timestamp,
            height,
        })
    }
}

/// SHA-256 over the signed encodings of `transactions`, in order.
pub fn calculate_data_hash(transactions: &[Transaction]) -> Hash {
    let mut hasher = Sha256::new();
    for tx in transactions {
        hasher.update(tx.signed_bytes());
    }
    Hash::new(hasher.finalize().into())
}

fn now_nanos() -> u64 {
    crate::types::unix_nanos().max(0) as u64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    header: Header,
    transactions: Vec<Transaction>,
    validator: Option<PublicKey>,
    signature: Option<Signature>,
    #[serde(skip)]
    hash: OnceCell<Hash>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Self {
        Block {
            header,
            transactions,
            validator: None,
            signature: None,
            hash: OnceCell::new(),
        }
    }

    /// A height-0 block with a zero previous hash and no transactions.
    pub fn genesis(version: u32) -> Self {
        let transactions = Vec::new();
        let header = Header {
            version,
            data_hash: calculate_data_hash(&transactions),
            prev_block_hash: Hash::default(),
            timestamp: now_nanos(),
            height: 0,
        };
        Block::new(header, transactions)
    }

    /// Assembles the block that extends `prev`. Fails with `HeightOverflow`
    /// when `prev` already sits at `u32::MAX`.
    pub fn from_prev_header(prev: &Header, transactions: Vec<Transaction>) -> Result<Self> {
        let height = prev
            .height
            .checked_add(1)
            .ok_or(LedgerError::HeightOverflow(prev.height))?;
        let header = Header {
            version: prev.version,
            data_hash: calculate_data_hash(&transactions),
            prev_block_hash: BlockHasher.hash(prev),
            timestamp: now_nanos(),
            height,
        };
        Ok(Block::new(header, transactions))
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn height(&self) -> u32 {
        self.header.height
    }

    pub fn prev_block_hash(&self) -> Hash {
        self.header.prev_block_hash
    }

    pub fn data_hash(&self) -> Hash {
        self.header.data_hash
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn validator(&self) -> Option<&PublicKey> {
        self.validator.as_ref()
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Appends without validation. While the block hash has not been computed
    /// the header's data hash follows the transaction list; afterwards the
    /// header is frozen.
    pub fn add_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
        if self.hash.get().is_none() {
            self.header.data_hash = calculate_data_hash(&self.transactions);
        }
    }

    /// Signs the canonical header encoding.
    pub fn sign(&mut self, keypair: &KeyPair) -> Result<()> {
        let signature = keypair.sign(&self.header.to_bytes())?;
        self.validator = Some(keypair.public_key());
        self.signature = Some(signature);
        Ok(())
    }

    /// Checks, in order: presence of a block signature, every transaction,
    /// the block signature itself, then the data hash.
    pub fn verify(&self) -> Result<()> {
        let (validator, signature) = match (&self.validator, &self.signature) {
            (Some(validator), Some(signature)) => (validator, signature),
            _ => return Err(LedgerError::MissingSignature(Artifact::Block)),
        };

        for tx in &self.transactions {
            tx.verify()?;
        }

        if !signature.verify(validator, &self.header.to_bytes()) {
            return Err(LedgerError::InvalidSignature(Artifact::Block));
        }

        let expected = calculate_data_hash(&self.transactions);
        if expected != self.header.data_hash {
            return Err(LedgerError::DataHashMismatch {
                expected,
                got: self.header.data_hash,
            });
        }

        Ok(())
    }

    /// Hash of the header, computed once and then frozen for the block's lifetime.
    pub fn hash<H: Hasher<Header>>(&self, hasher: &H) -> Hash {
        *self.hash.get_or_init(|| hasher.hash(&self.header))
    }
}
