//! Encoder/decoder capabilities for ledger artifacts.
//!
//! Headers use their canonical little-endian layout (the same bytes that are
//! hashed and signed). Transactions and blocks travel as bincode.

use crate::block::Header;
use crate::error::Result;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

pub trait Encoder<T> {
    fn encode(&self, item: &T, writer: &mut dyn Write) -> Result<()>;
}

pub trait Decoder<T> {
    fn decode(&self, reader: &mut dyn Read) -> Result<T>;
}

/// Encodes `item` into a fresh buffer.
pub fn encode_to_vec<T, E: Encoder<T>>(encoder: &E, item: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encoder.encode(item, &mut buf)?;
    Ok(buf)
}

/// Canonical header codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderCodec;

impl Encoder<Header> for HeaderCodec {
    fn encode(&self, header: &Header, writer: &mut dyn Write) -> Result<()> {
        header.encode_binary(writer)
    }
}

impl Decoder<Header> for HeaderCodec {
    fn decode(&self, reader: &mut dyn Read) -> Result<Header> {
        Header::decode_binary(reader)
    }
}

/// Upper bound on a single decoded artifact (32 MiB)
pub const MAX_WIRE_SIZE: u64 = 32 * 1024 * 1024;

/// Wire codec for any serde type.
///
/// Decoding refuses length prefixes that would read past [`MAX_WIRE_SIZE`],
/// so forged input fails with a codec error instead of a huge allocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(MAX_WIRE_SIZE)
}

impl<T: Serialize> Encoder<T> for BincodeCodec {
    fn encode(&self, item: &T, writer: &mut dyn Write) -> Result<()> {
        wire_options().serialize_into(writer, item)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> Decoder<T> for BincodeCodec {
    fn decode(&self, reader: &mut dyn Read) -> Result<T> {
        Ok(wire_options().deserialize_from(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use crate::error::LedgerError;
    use crate::transaction::Transaction;
    use crate::types::Hash;

    #[test]
    fn test_header_codec_round_trip() {
        let header = Header {
            version: 1,
            data_hash: Hash::random(),
            prev_block_hash: Hash::random(),
            timestamp: 1_700_000_000_000_000_000,
            height: 10,
        };

        let bytes = encode_to_vec(&HeaderCodec, &header).unwrap();
        assert_eq!(bytes, header.to_bytes());

        let decoded: Header = HeaderCodec.decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_header_codec_rejects_truncated_input() {
        let bytes = Header::default().to_bytes();
        let result: Result<Header> = HeaderCodec.decode(&mut &bytes[..bytes.len() - 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_forged_length_prefix_is_a_codec_error() {
        // claims a 1 TiB payload
        let bytes = (1u64 << 40).to_le_bytes();

        let tx: Result<Transaction> = BincodeCodec.decode(&mut bytes.as_slice());
        assert!(matches!(tx, Err(LedgerError::Codec(_))));
    }

    #[test]
    fn test_forged_transaction_count_is_a_codec_error() {
        let block = Block::genesis(1);
        let mut bytes = encode_to_vec(&BincodeCodec, &block).unwrap();
        // header is the first 80 bytes, the transaction count follows
        bytes.truncate(80);
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());

        let decoded: Result<Block> = BincodeCodec.decode(&mut bytes.as_slice());
        assert!(matches!(decoded, Err(LedgerError::Codec(_))));
    }

    #[test]
    fn test_wire_round_trip_keeps_payload() {
        let tx = Transaction::new(b"hello".to_vec());
        let bytes = encode_to_vec(&BincodeCodec, &tx).unwrap();
        let decoded: Transaction = BincodeCodec.decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded.data(), b"hello");
    }
}
