//! `shopledger-engine` — the purchase and creation protocols.
//!
//! `MarketplaceEngine` wraps the catalog's `ProductStore` and is the locus
//! of all business invariants: it validates creation requests, settles
//! purchases atomically (counter update and seller credit commit together),
//! and publishes domain events in commit order.

pub mod balances;
pub mod engine;
pub mod events;

pub use balances::BalanceBook;
pub use engine::{CreateProduct, MarketplaceEngine, Receipt};
pub use events::{MarketEvent, ProductCreated, ProductSold};
