use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use shopledger_core::{LedgerError, LedgerResult};

use crate::product::{ProductDraft, ProductRecord};

/// Append-only, index-addressed product table.
///
/// Indices are assigned sequentially from 0, are never reused, and the
/// table never shrinks. Reads serve a snapshot consistent as of the last
/// committed write. The store enforces no business rules beyond counter
/// arithmetic safety; serialization of check-then-mutate sequences is the
/// engine's job.
#[derive(Debug, Default)]
pub struct ProductStore {
    records: RwLock<Vec<ProductRecord>>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    // No code path panics while holding the lock, so poisoning is
    // unreachable; recover the guard rather than surfacing a fatal error.
    fn read(&self) -> RwLockReadGuard<'_, Vec<ProductRecord>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ProductRecord>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `draft` under the next sequential index and return that index.
    ///
    /// The sold counter starts at zero. No validation happens here.
    pub fn append(&self, draft: ProductDraft) -> u64 {
        let mut records = self.write();
        let index = records.len() as u64;
        records.push(ProductRecord {
            index,
            sku: draft.sku,
            name: draft.name,
            image: draft.image,
            description: draft.description,
            price: draft.price,
            quantity_available: draft.quantity_available,
            quantity_sold: 0,
            owner: draft.owner,
        });
        index
    }

    /// Fetch a copy of the record at `index`.
    pub fn get(&self, index: u64) -> LedgerResult<ProductRecord> {
        let records = self.read();
        usize::try_from(index)
            .ok()
            .and_then(|i| records.get(i))
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    /// Current number of products in the catalog.
    pub fn count(&self) -> u64 {
        self.read().len() as u64
    }

    /// Copy of the whole table, consistent as of the last committed write.
    pub fn snapshot(&self) -> Vec<ProductRecord> {
        self.read().clone()
    }

    /// Apply `sold_delta` and `available_delta` to the record at `index`.
    ///
    /// Both deltas are applied together or not at all: the arithmetic is
    /// checked up front and any overflow or underflow rejects the whole
    /// update as `InvalidInput` (wraparound would break the stock
    /// invariant). Returns the updated record.
    pub fn update_counters(
        &self,
        index: u64,
        sold_delta: i64,
        available_delta: i64,
    ) -> LedgerResult<ProductRecord> {
        let mut records = self.write();
        let record = usize::try_from(index)
            .ok()
            .and_then(|i| records.get_mut(i))
            .ok_or(LedgerError::NotFound)?;

        let new_sold = record
            .quantity_sold
            .checked_add_signed(sold_delta)
            .ok_or_else(|| LedgerError::invalid_input("sold counter out of range"))?;
        let new_available = record
            .quantity_available
            .checked_add_signed(available_delta)
            .ok_or_else(|| LedgerError::invalid_input("available counter out of range"))?;

        record.quantity_sold = new_sold;
        record.quantity_available = new_available;
        Ok(record.clone())
    }
}
