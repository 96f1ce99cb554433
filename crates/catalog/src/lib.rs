//! `shopledger-catalog` — the product table.
//!
//! This crate owns the ordered, append-only collection of product records,
//! addressable by dense index. It enforces structural guarantees only
//! (index density, counter arithmetic safety); business rules such as
//! price validation and the purchase protocol live in `shopledger-engine`.

pub mod product;
pub mod store;

pub use product::{Availability, ProductDraft, ProductRecord};
pub use store::ProductStore;
