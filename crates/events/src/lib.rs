//! `shopledger-events` — domain event abstraction.
//!
//! The `Event` trait describes what an event *is*; the `EventBus` trait and
//! `InMemoryEventBus` handle distribution to subscribers. Storage is the
//! ledger's concern, not the bus's.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
