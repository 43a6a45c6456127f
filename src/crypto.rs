//! Cryptographic identity: key pairs, signatures and address derivation (secp256k1)

use crate::error::LedgerError;
use crate::types::{Address, ADDRESS_LENGTH};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{
    constants::{PUBLIC_KEY_SIZE, SECRET_KEY_SIZE},
    ecdsa, All, Message, Secp256k1, SecretKey,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// A thread-safe, lazily initialized Secp256k1 context.
static SECP256K1_CONTEXT: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

/// Secret keys are rejected by the curve with negligible probability; give up after this many draws.
const MAX_KEYGEN_ATTEMPTS: usize = 8;

fn message_digest(payload: &[u8]) -> Result<Message, LedgerError> {
    let digest = Sha256::digest(payload);
    Message::from_digest_slice(&digest)
        .map_err(|e| LedgerError::InvalidKey(format!("Failed to create message: {}", e)))
}

/// A private key together with its derived public key.
///
/// The secret half never leaves the key pair; only the [`PublicKey`] is handed out.
#[derive(Clone)]
pub struct KeyPair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl KeyPair {
    /// Generates a new random key pair from the OS entropy source.
    ///
    /// # Panics
    ///
    /// Panics if the entropy source fails. A node cannot operate without key
    /// material, so this is treated as unrecoverable.
    pub fn generate() -> Self {
        match Self::try_generate() {
            Ok(keypair) => keypair,
            Err(e) => panic!("{}", e),
        }
    }

    /// Fallible variant of [`KeyPair::generate`].
    pub fn try_generate() -> Result<Self, LedgerError> {
        let mut bytes = [0u8; SECRET_KEY_SIZE];
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            OsRng
                .try_fill_bytes(&mut bytes)
                .map_err(|e| LedgerError::KeyGenerationFailure(e.to_string()))?;
            if let Ok(secret_key) = SecretKey::from_slice(&bytes) {
                return Ok(Self::from_secret_key(secret_key));
            }
        }
        Err(LedgerError::KeyGenerationFailure(
            "entropy source produced no valid secret key".to_string(),
        ))
    }

    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let public_key =
            PublicKey(secp256k1::PublicKey::from_secret_key(&SECP256K1_CONTEXT, &secret_key));
        KeyPair {
            secret_key,
            public_key,
        }
    }

    /// Creates a key pair from raw secret key bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let secret_key = SecretKey::from_slice(bytes).map_err(|e| {
            if bytes.len() != SECRET_KEY_SIZE {
                LedgerError::InvalidKey(format!(
                    "Secret key must be {} bytes, got {}",
                    SECRET_KEY_SIZE,
                    bytes.len()
                ))
            } else {
                LedgerError::InvalidKey(format!("Invalid secret key bytes: {}", e))
            }
        })?;
        Ok(Self::from_secret_key(secret_key))
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn address(&self) -> Address {
        self.public_key.address()
    }

    /// Signs the SHA-256 digest of `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<Signature, LedgerError> {
        let message = message_digest(payload)?;
        let signature = SECP256K1_CONTEXT.sign_ecdsa(&message, &self.secret_key);
        Ok(Signature::from_compact(signature.serialize_compact()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

/// The shareable half of a key pair. Serializes as its 33-byte compressed encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        if bytes.len() != PUBLIC_KEY_SIZE {
            return Err(LedgerError::InvalidKey(format!(
                "Public key must be exactly {} bytes (compressed), got {}",
                PUBLIC_KEY_SIZE,
                bytes.len()
            )));
        }
        secp256k1::PublicKey::from_slice(bytes)
            .map(PublicKey)
            .map_err(|e| LedgerError::InvalidKey(format!("Invalid public key: {}", e)))
    }

    /// Compressed SEC1 encoding (prefix byte + x coordinate).
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.serialize()
    }

    /// The last 28 bytes of the SHA-256 digest of the compressed key.
    pub fn address(&self) -> Address {
        let digest: [u8; 32] = Sha256::digest(self.to_bytes()).into();
        let mut value = [0u8; ADDRESS_LENGTH];
        value.copy_from_slice(&digest[digest.len() - ADDRESS_LENGTH..]);
        Address::from(value)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serde_bytes::ByteBuf::deserialize(deserializer)?;
        PublicKey::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// An ECDSA signature as its two scalar components.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl Signature {
    pub fn from_compact(bytes: [u8; 64]) -> Self {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..]);
        Signature { r, s }
    }

    pub fn to_compact(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.r);
        bytes[32..].copy_from_slice(&self.s);
        bytes
    }

    /// Returns true iff this signature was produced over `payload` by the
    /// owner of `public_key`. Malformed components yield false.
    pub fn verify(&self, public_key: &PublicKey, payload: &[u8]) -> bool {
        let Ok(message) = message_digest(payload) else {
            return false;
        };
        let Ok(signature) = ecdsa::Signature::from_compact(&self.to_compact()) else {
            return false;
        };
        SECP256K1_CONTEXT
            .verify_ecdsa(&message, &signature, &public_key.0)
            .is_ok()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(self.to_compact()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_verify_success() {
        let keypair = KeyPair::generate();
        let message = b"Hello, World!";

        let signature = keypair.sign(message).unwrap();
        assert!(signature.verify(&keypair.public_key(), message));
    }

    #[test]
    fn test_verify_with_other_key_fails() {
        let keypair = KeyPair::generate();
        let other = KeyPair::generate();
        let message = b"Hello, World!";

        let signature = keypair.sign(message).unwrap();
        assert!(!signature.verify(&other.public_key(), message));
        assert!(!signature.verify(&keypair.public_key(), b"Hello, World"));
    }

    #[test]
    fn test_malformed_signature_is_false() {
        let keypair = KeyPair::generate();
        let zeroed = Signature {
            r: [0u8; 32],
            s: [0u8; 32],
        };
        assert!(!zeroed.verify(&keypair.public_key(), b"payload"));

        let overflow = Signature {
            r: [0xff; 32],
            s: [0xff; 32],
        };
        assert!(!overflow.verify(&keypair.public_key(), b"payload"));
    }

    #[test]
    fn test_address_is_28_byte_digest_suffix() {
        let keypair = KeyPair::generate();
        let digest: [u8; 32] = Sha256::digest(keypair.public_key().to_bytes()).into();
        assert_eq!(keypair.address().as_bytes()[..], digest[4..]);
    }

    #[test]
    fn test_public_key_bytes_round_trip() {
        let keypair = KeyPair::generate();
        let bytes = keypair.public_key().to_bytes();
        assert_eq!(bytes.len(), PUBLIC_KEY_SIZE);
        assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), keypair.public_key());

        let result = PublicKey::from_bytes(&bytes[1..]);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Public key must be exactly"));
    }

    #[test]
    fn test_from_secret_bytes_is_deterministic() {
        let secret = [7u8; SECRET_KEY_SIZE];
        let a = KeyPair::from_secret_bytes(&secret).unwrap();
        let b = KeyPair::from_secret_bytes(&secret).unwrap();
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.address(), b.address());

        let result = KeyPair::from_secret_bytes(&secret[1..]);
        assert!(result.unwrap_err().to_string().contains("Secret key must be"));
    }
}
