use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use shopledger_core::{AccountId, LedgerError, LedgerResult};

/// Accumulated proceeds per seller, in the smallest currency unit.
///
/// The book only ever grows: there are no debits (refunds are out of
/// scope). Credits are applied under the engine's commit lock so a credit
/// always lands in the same atomic unit as its counter update.
#[derive(Debug, Default)]
pub struct BalanceBook {
    balances: RwLock<HashMap<AccountId, u64>>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `account`; zero for accounts never credited.
    pub fn balance_of(&self, account: AccountId) -> u64 {
        self.balances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&account)
            .copied()
            .unwrap_or(0)
    }

    /// Add `amount` to `account`, rejecting overflow instead of wrapping.
    /// Returns the new balance.
    pub fn credit(&self, account: AccountId, amount: u64) -> LedgerResult<u64> {
        let mut balances = self
            .balances
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = balances.entry(account).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid_input("balance out of range"))?;
        Ok(*entry)
    }
}
