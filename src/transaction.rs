//! Transaction module split into types and validation

pub mod types;
pub mod validation;

pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;
    use crate::error::{Artifact, LedgerError};
    use crate::hasher::{Hasher, TxHasher};

    fn random_tx_with_signature() -> Transaction {
        let keypair = KeyPair::generate();
        let mut tx = Transaction::new(b"foo".to_vec());
        tx.sign(&keypair).unwrap();
        tx
    }

    #[test]
    fn test_sign_transaction() {
        let keypair = KeyPair::generate();
        let mut tx = Transaction::new(b"foo".to_vec());

        assert!(tx.sign(&keypair).is_ok());
        assert_eq!(tx.signer(), Some(&keypair.public_key()));
        assert!(tx.signature().is_some());
    }

    #[test]
    fn test_verify_transaction() {
        let mut tx = random_tx_with_signature();
        assert!(tx.verify().is_ok());

        let other = KeyPair::generate();
        tx.signer = Some(other.public_key());
        assert_eq!(
            tx.verify(),
            Err(LedgerError::InvalidSignature(Artifact::Transaction))
        );
    }

    #[test]
    fn test_unsigned_transaction_fails_closed() {
        let tx = Transaction::new(b"foo".to_vec());
        assert_eq!(
            tx.verify(),
            Err(LedgerError::MissingSignature(Artifact::Transaction))
        );
    }

    #[test]
    fn test_tampered_payload_fails() {
        let mut tx = random_tx_with_signature();
        tx.data = b"bar".to_vec();
        assert_eq!(
            tx.verify(),
            Err(LedgerError::InvalidSignature(Artifact::Transaction))
        );
    }

    #[test]
    fn test_resign_replaces_signer() {
        let first = KeyPair::generate();
        let second = KeyPair::generate();
        let mut tx = Transaction::new(b"foo".to_vec());

        tx.sign(&first).unwrap();
        tx.sign(&second).unwrap();

        assert_eq!(tx.signer(), Some(&second.public_key()));
        assert!(tx.verify().is_ok());
    }

    #[test]
    fn test_hash_is_cached_and_independent_of_signing() {
        let keypair = KeyPair::generate();
        let mut tx = Transaction::new(b"foo".to_vec());
        let before = tx.hash(&TxHasher);

        tx.sign(&keypair).unwrap();
        tx.set_first_seen(42);

        assert_eq!(tx.hash(&TxHasher), before);
        assert_eq!(TxHasher.hash(&tx), before);
        assert_eq!(Transaction::new(b"foo".to_vec()).hash(&TxHasher), before);
    }

    #[test]
    fn test_signed_bytes_commit_to_signature() {
        let unsigned = Transaction::new(b"foo".to_vec());
        let signed = random_tx_with_signature();
        assert_eq!(unsigned.to_bytes(), signed.to_bytes());
        assert_ne!(unsigned.signed_bytes(), signed.signed_bytes());
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let keypair = KeyPair::generate();
        let mut tx = Transaction::new(vec![7u8; MAX_TRANSACTION_SIZE + 1]);
        let too_large = LedgerError::TransactionTooLarge {
            size: MAX_TRANSACTION_SIZE + 1,
            max: MAX_TRANSACTION_SIZE,
        };

        assert_eq!(tx.sign(&keypair), Err(too_large.clone()));
        assert!(tx.signature().is_none());

        // a signer that skipped the cap is still caught on verify
        let mut signed = random_tx_with_signature();
        signed.data = vec![7u8; MAX_TRANSACTION_SIZE + 1];
        assert_eq!(signed.verify(), Err(too_large));
    }

    #[test]
    fn test_length_prefix_is_exact_at_the_cap() {
        let tx = Transaction::new(vec![1u8; MAX_TRANSACTION_SIZE]);
        let bytes = tx.to_bytes();
        assert_eq!(bytes[..4], (MAX_TRANSACTION_SIZE as u32).to_le_bytes());
        assert_eq!(bytes.len(), 4 + MAX_TRANSACTION_SIZE);
        assert!(tx.validate_size().is_ok());
    }
}
