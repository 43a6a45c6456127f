use crate::block::Block;
use crate::blockchain::chain::HeaderChain;
use crate::error::{LedgerError, Result};
use crate::hasher::{BlockHasher, Hasher};

/// Policy consulted by the ledger before every append.
///
/// Validators get a read-only view of the accepted headers and never mutate the ledger.
pub trait Validator: Send + Sync {
    fn validate_block(&self, chain: &HeaderChain, block: &Block) -> Result<()>;
}

/// Default policy: strictly sequential, hash-linked, signed blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockValidator;

impl BlockValidator {
    pub fn new() -> Self {
        BlockValidator
    }
}

impl Validator for BlockValidator {
    /// Fail-fast order: duplicate, sequencing, linkage, authenticity.
    fn validate_block(&self, chain: &HeaderChain, block: &Block) -> Result<()> {
        let height = block.height();

        if chain.has_block(height) {
            return Err(LedgerError::DuplicateBlock {
                height,
                hash: BlockHasher.hash(block.header()),
            });
        }

        let expected = chain
            .height()
            .checked_add(1)
            .ok_or(LedgerError::HeightOverflow(chain.height()))?;
        if height != expected {
            return Err(LedgerError::OutOfSequenceHeight {
                height,
                expected,
                hash: BlockHasher.hash(block.header()),
            });
        }

        let prev_header = chain.get_header(height - 1)?;
        let prev_hash = BlockHasher.hash(prev_header);
        if prev_hash != block.prev_block_hash() {
            return Err(LedgerError::InvalidPreviousHash {
                expected: prev_hash,
                got: block.prev_block_hash(),
            });
        }

        block.verify()
    }
}
