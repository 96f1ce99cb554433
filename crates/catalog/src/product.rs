use serde::{Deserialize, Serialize};

use shopledger_core::AccountId;

/// A product as stored in the catalog.
///
/// `index` is assigned by the store at append time and never changes;
/// `price` is fixed at creation. Only the two counters ever mutate, and
/// `quantity_available + quantity_sold` stays equal to the quantity set
/// at creation for the lifetime of the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Dense position in the catalog, starting at 0. Never reused.
    pub index: u64,
    /// Caller-supplied stock-keeping unit. Uniqueness is not enforced.
    pub sku: u64,
    pub name: String,
    /// Image URI; empty permitted (the presentation layer substitutes a
    /// default).
    pub image: String,
    pub description: String,
    /// Price in the smallest currency unit. Immutable.
    pub price: u64,
    pub quantity_available: u64,
    pub quantity_sold: u64,
    /// The creator's identity; receives proceeds on each sale.
    pub owner: AccountId,
}

impl ProductRecord {
    /// Derived stock state. Never stored; computed from the counters.
    pub fn availability(&self) -> Availability {
        if self.quantity_available == 0 {
            Availability::SoldOut
        } else if self.quantity_sold == 0 {
            Availability::Available
        } else {
            Availability::PartiallySold
        }
    }
}

/// Stock state of a product, derived solely from its counters.
///
/// `buy` is the only transition; there is no path back to higher stock
/// (restocking is out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    PartiallySold,
    SoldOut,
}

/// A not-yet-stored product: everything but the index and the sold
/// counter, which the store assigns at append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: u64,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: u64,
    pub quantity_available: u64,
    pub owner: AccountId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(available: u64, sold: u64) -> ProductRecord {
        ProductRecord {
            index: 0,
            sku: 1,
            name: "Widget".to_string(),
            image: String::new(),
            description: String::new(),
            price: 100,
            quantity_available: available,
            quantity_sold: sold,
            owner: AccountId::new(),
        }
    }

    #[test]
    fn availability_tracks_counters() {
        assert_eq!(record(5, 0).availability(), Availability::Available);
        assert_eq!(record(4, 1).availability(), Availability::PartiallySold);
        assert_eq!(record(0, 5).availability(), Availability::SoldOut);
    }

    #[test]
    fn fresh_record_with_zero_stock_is_sold_out() {
        // Availability is derived solely from quantity_available.
        assert_eq!(record(0, 0).availability(), Availability::SoldOut);
    }
}
