// Thin re-export module: the ledger lives in `blockchain/chain.rs`, the
// chain-extension policy in `blockchain/validation.rs`.

pub mod chain;
pub mod validation;

pub use chain::*;
pub use validation::*;
