use crate::block::{Block, Header};
use crate::blockchain::validation::{BlockValidator, Validator};
use crate::error::{LedgerError, Result};
use crate::hasher::{BlockHasher, Hasher};
use crate::storage::{MemoryStorage, Storage};
use crate::types::Hash;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Accepted headers indexed by height. `headers[i].height == i` always holds.
#[derive(Debug, Default, Clone)]
pub struct HeaderChain {
    headers: Vec<Header>,
}

impl HeaderChain {
    /// `len - 1`. Only meaningful once genesis has been committed.
    pub fn height(&self) -> u32 {
        (self.headers.len() as u32).saturating_sub(1)
    }

    pub fn has_block(&self, height: u32) -> bool {
        height <= self.height()
    }

    pub fn get_header(&self, height: u32) -> Result<&Header> {
        self.headers
            .get(height as usize)
            .ok_or_else(|| LedgerError::HeightTooHigh {
                requested: height,
                current: self.height(),
            })
    }

    pub fn tip(&self) -> Option<&Header> {
        self.headers.last()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    fn push(&mut self, header: Header) {
        self.headers.push(header);
    }
}

/// The append-only ledger.
///
/// The header index sits behind a write lock that is held across every
/// validate-then-commit sequence, so concurrent appenders cannot both extend
/// the same tip.
pub struct Blockchain {
    headers: RwLock<HeaderChain>,
    store: Box<dyn Storage>,
    validator: RwLock<Arc<dyn Validator>>,
}

impl Blockchain {
    /// Create a new `Blockchain` backed by in-memory storage.
    pub fn new(genesis: Block) -> Result<Self> {
        Self::with_storage(genesis, Box::new(MemoryStorage::new()))
    }

    /// Create a new `Blockchain` with the provided storage backend. The
    /// genesis block is committed without validation.
    pub fn with_storage(genesis: Block, store: Box<dyn Storage>) -> Result<Self> {
        if genesis.height() != 0 {
            return Err(LedgerError::OutOfSequenceHeight {
                height: genesis.height(),
                expected: 0,
                hash: BlockHasher.hash(genesis.header()),
            });
        }

        let blockchain = Blockchain {
            headers: RwLock::new(HeaderChain::default()),
            store,
            validator: RwLock::new(Arc::new(BlockValidator::new())),
        };

        {
            let mut headers = blockchain.headers.write();
            blockchain.commit(&mut headers, &genesis)?;
        }

        info!(hash = %genesis.hash(&BlockHasher), "genesis block committed");
        Ok(blockchain)
    }

    /// Swap the validation policy. In-flight appends finish under the old one.
    pub fn set_validator(&self, validator: Arc<dyn Validator>) {
        *self.validator.write() = validator;
    }

    /// Validate `block` against the current tip and commit it. On error the
    /// ledger is left untouched.
    pub fn add_block(&self, block: &Block) -> Result<()> {
        let validator = Arc::clone(&*self.validator.read());
        let mut headers = self.headers.write();

        if let Err(e) = validator.validate_block(&headers, block) {
            warn!(height = block.height(), error = %e, "rejected block");
            return Err(e);
        }

        self.commit(&mut headers, block)
    }

    /// Store first, index second: a store failure leaves the index as it was.
    fn commit(&self, headers: &mut HeaderChain, block: &Block) -> Result<()> {
        self.store.put(block)?;
        headers.push(block.header().clone());

        debug!(
            height = block.height(),
            hash = %block.hash(&BlockHasher),
            transactions = block.transactions().len(),
            "committed block"
        );
        Ok(())
    }

    pub fn get_header(&self, height: u32) -> Result<Header> {
        self.headers.read().get_header(height).cloned()
    }

    pub fn has_block(&self, height: u32) -> bool {
        self.headers.read().has_block(height)
    }

    pub fn height(&self) -> u32 {
        self.headers.read().height()
    }

    /// Header of the most recently accepted block.
    pub fn tip(&self) -> Option<Header> {
        self.headers.read().tip().cloned()
    }

    pub fn tip_hash(&self) -> Option<Hash> {
        self.headers.read().tip().map(|header| BlockHasher.hash(header))
    }

    pub fn get_block(&self, hash: &Hash) -> Result<Option<Block>> {
        self.store.get(hash)
    }
}
