//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Every variant is recoverable by the caller: the store is never left
/// partially mutated by a failed operation, and the engine performs no
/// internal retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A creation request failed validation, or checked arithmetic on a
    /// counter/balance would overflow (overflow is rejected, never wrapped).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The index does not resolve to a product (outside `[0, count)`).
    #[error("product not found")]
    NotFound,

    /// The product has no remaining units.
    #[error("out of stock")]
    OutOfStock,

    /// The offered payment does not match the fixed price exactly.
    /// Underpayment and overpayment are both rejected; no change-making.
    #[error("invalid payment: expected {expected}, offered {offered}")]
    InvalidPayment { expected: u64, offered: u64 },
}

impl LedgerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn invalid_payment(expected: u64, offered: u64) -> Self {
        Self::InvalidPayment { expected, offered }
    }
}
