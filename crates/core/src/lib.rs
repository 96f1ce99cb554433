//! `shopledger-core` — ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the shared error taxonomy and strongly-typed identifiers.

pub mod error;
pub mod id;

pub use error::{LedgerError, LedgerResult};
pub use id::AccountId;
