use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use shopledger_catalog::{ProductDraft, ProductRecord, ProductStore};
use shopledger_core::{AccountId, LedgerError, LedgerResult};
use shopledger_events::{EventBus, InMemoryEventBus, Subscription};

use crate::balances::BalanceBook;
use crate::events::{MarketEvent, ProductCreated, ProductSold};

/// A creation request, as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    /// Caller-supplied stock-keeping unit. Duplicates are accepted.
    pub sku: u64,
    pub name: String,
    pub image: String,
    pub description: String,
    /// Price in the smallest currency unit; must be positive.
    pub price: u64,
    /// Initial stock; must be positive.
    pub quantity_available: u64,
    /// The creator, recorded as owner; receives proceeds on each sale.
    pub caller: AccountId,
}

/// Return value of a successful purchase: the post-commit counters plus
/// the credited party, so the caller can reconcile local state without
/// waiting for the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub index: u64,
    pub quantity_sold: u64,
    pub quantity_available: u64,
    pub amount_paid: u64,
    pub seller: AccountId,
}

/// The marketplace transition logic.
///
/// All business invariants are enforced here; the store beneath only
/// guarantees structure. Every mutating call runs its whole
/// validate-mutate-publish sequence under a single commit lock, so
/// per-record mutation is serialized, the seller credit commits in the
/// same atomic unit as the counter update, and events go out in commit
/// order. Reads bypass the commit lock entirely.
#[derive(Debug)]
pub struct MarketplaceEngine<B = InMemoryEventBus<MarketEvent>>
where
    B: EventBus<MarketEvent>,
{
    store: Arc<ProductStore>,
    balances: BalanceBook,
    bus: B,
    commit: Mutex<()>,
}

impl MarketplaceEngine<InMemoryEventBus<MarketEvent>> {
    /// Engine over a fresh store with the in-memory bus.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(ProductStore::new()), InMemoryEventBus::new())
    }
}

impl<B> MarketplaceEngine<B>
where
    B: EventBus<MarketEvent>,
{
    /// Build an engine over an existing store. One store, one engine per
    /// deployment; the store is shared by reference so read-side callers
    /// can keep their own handle.
    pub fn new(store: Arc<ProductStore>, bus: B) -> Self {
        Self {
            store,
            balances: BalanceBook::new(),
            bus,
            commit: Mutex::new(()),
        }
    }

    /// Validate and store a new product, returning its assigned index.
    ///
    /// Constraints, first failure wins: non-empty name, positive price,
    /// positive initial stock. Emits `ProductCreated` on commit.
    pub fn create_product(&self, request: CreateProduct) -> LedgerResult<u64> {
        if request.name.trim().is_empty() {
            return Err(LedgerError::invalid_input("name cannot be empty"));
        }
        if request.price == 0 {
            return Err(LedgerError::invalid_input("price must be positive"));
        }
        if request.quantity_available == 0 {
            return Err(LedgerError::invalid_input("quantity must be positive"));
        }

        let _commit = self.commit.lock().unwrap_or_else(PoisonError::into_inner);

        let index = self.store.append(ProductDraft {
            sku: request.sku,
            name: request.name.clone(),
            image: request.image.clone(),
            description: request.description.clone(),
            price: request.price,
            quantity_available: request.quantity_available,
            owner: request.caller,
        });

        tracing::info!(index, sku = request.sku, price = request.price, "product created");

        self.publish(MarketEvent::ProductCreated(ProductCreated {
            index,
            sku: request.sku,
            name: request.name,
            image: request.image,
            description: request.description,
            price: request.price,
            quantity_available: request.quantity_available,
            owner: request.caller,
            occurred_at: Utc::now(),
        }));

        Ok(index)
    }

    /// Settle a single-unit purchase of the product at `index`.
    ///
    /// Checks, in order: the index resolves (`NotFound`), stock remains
    /// (`OutOfStock`), the payment matches the price exactly
    /// (`InvalidPayment`). All arithmetic is validated before anything
    /// mutates, so a failure leaves counters and balances untouched.
    pub fn buy_product(
        &self,
        index: u64,
        payment: u64,
        buyer: AccountId,
    ) -> LedgerResult<Receipt> {
        let _commit = self.commit.lock().unwrap_or_else(PoisonError::into_inner);

        let record = self.store.get(index)?;

        if record.quantity_available == 0 {
            return Err(LedgerError::OutOfStock);
        }
        if payment != record.price {
            return Err(LedgerError::invalid_payment(record.price, payment));
        }

        // Prove both mutations will succeed before applying either.
        record
            .quantity_sold
            .checked_add(1)
            .ok_or_else(|| LedgerError::invalid_input("sold counter out of range"))?;
        self.balances
            .balance_of(record.owner)
            .checked_add(payment)
            .ok_or_else(|| LedgerError::invalid_input("balance out of range"))?;

        let updated = self.store.update_counters(index, 1, -1)?;
        self.balances.credit(record.owner, payment)?;

        tracing::info!(
            index,
            remaining = updated.quantity_available,
            amount = payment,
            "product sold"
        );

        self.publish(MarketEvent::ProductSold(ProductSold {
            index,
            quantity_sold: updated.quantity_sold,
            quantity_available: updated.quantity_available,
            buyer,
            amount_paid: payment,
            occurred_at: Utc::now(),
        }));

        Ok(Receipt {
            index,
            quantity_sold: updated.quantity_sold,
            quantity_available: updated.quantity_available,
            amount_paid: payment,
            seller: record.owner,
        })
    }

    /// Fetch a copy of the product at `index`.
    pub fn get(&self, index: u64) -> LedgerResult<ProductRecord> {
        self.store.get(index)
    }

    /// Current catalog size.
    pub fn count(&self) -> u64 {
        self.store.count()
    }

    /// Consistent copy of the whole catalog.
    pub fn snapshot(&self) -> Vec<ProductRecord> {
        self.store.snapshot()
    }

    /// Accumulated proceeds of `account`.
    pub fn balance_of(&self, account: AccountId) -> u64 {
        self.balances.balance_of(account)
    }

    /// Attach a subscriber to the event stream. Dropping the returned
    /// handle detaches it.
    pub fn subscribe(&self) -> Subscription<MarketEvent> {
        self.bus.subscribe()
    }

    fn publish(&self, event: MarketEvent) {
        // The mutation is already committed; a bus failure loses this
        // delivery but not the ledger state, and subscribers reconcile
        // via reads.
        if let Err(err) = self.bus.publish(event) {
            tracing::warn!(?err, "event publish failed");
        }
    }
}
