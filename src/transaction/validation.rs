/// Authenticity checks for transactions, kept apart from the type definition
use crate::error::{Artifact, LedgerError, Result};
use crate::transaction::types::{Transaction, MAX_TRANSACTION_SIZE};

impl Transaction {
    /// Rejects payloads above [`MAX_TRANSACTION_SIZE`].
    pub fn validate_size(&self) -> Result<()> {
        if self.data.len() > MAX_TRANSACTION_SIZE {
            return Err(LedgerError::TransactionTooLarge {
                size: self.data.len(),
                max: MAX_TRANSACTION_SIZE,
            });
        }
        Ok(())
    }

    /// Fails closed: an unsigned or oversized transaction is never valid.
    pub fn verify(&self) -> Result<()> {
        self.validate_size()?;

        let (signer, signature) = match (&self.signer, &self.signature) {
            (Some(signer), Some(signature)) => (signer, signature),
            _ => return Err(LedgerError::MissingSignature(Artifact::Transaction)),
        };

        if !signature.verify(signer, &self.data) {
            return Err(LedgerError::InvalidSignature(Artifact::Transaction));
        }

        Ok(())
    }
}
