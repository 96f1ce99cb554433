use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_core::AccountId;
use shopledger_events::Event;

/// Event: ProductCreated. Carries the full record plus its assigned index
/// so subscribers can render the listing without a follow-up read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCreated {
    pub index: u64,
    pub sku: u64,
    pub name: String,
    pub image: String,
    pub description: String,
    pub price: u64,
    pub quantity_available: u64,
    pub owner: AccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductSold. Carries post-commit counters so subscribers can
/// reconcile stock without rereading the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSold {
    pub index: u64,
    pub quantity_sold: u64,
    pub quantity_available: u64,
    pub buyer: AccountId,
    pub amount_paid: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    ProductCreated(ProductCreated),
    ProductSold(ProductSold),
}

impl Event for MarketEvent {
    fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::ProductCreated(_) => "market.product.created",
            MarketEvent::ProductSold(_) => "market.product.sold",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            MarketEvent::ProductCreated(e) => e.occurred_at,
            MarketEvent::ProductSold(e) => e.occurred_at,
        }
    }
}
