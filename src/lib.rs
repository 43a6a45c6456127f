//! Fadden - a minimal append-only ledger of signed, hash-linked blocks
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - The ledger and its chain-extension validator
//! - [`block`] - Block and header structure
//! - [`transaction`] - Signed transactions
//! - [`mempool`] - Pool of unconfirmed transactions
//! - [`storage`] - Block storage backends
//!
//! ## Cryptography & Encoding
//! - [`crypto`] - Key pairs and signatures (secp256k1)
//! - [`hasher`] - Header and transaction hashing
//! - [`encoding`] - Canonical and wire codecs
//! - [`types`] - Hashes and addresses
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod blockchain;
pub mod mempool;
pub mod storage;
pub mod transaction;

// ============================================================================
// Cryptography & Encoding
// ============================================================================
pub mod crypto;
pub mod encoding;
pub mod hasher;
pub mod types;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
