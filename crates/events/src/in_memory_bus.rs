//! In-memory event bus.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

type Registry<M> = Arc<Mutex<HashMap<u64, mpsc::Sender<M>>>>;

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out to every registered subscriber
/// - Dropping a `Subscription` unregisters its sender, so detached
///   consumers receive nothing further
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Registry<M>,
    next_id: AtomicU64,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|_, tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.insert(id, tx);
        }

        let registry = Arc::clone(&self.subscribers);
        Subscription::new(
            rx,
            Box::new(move || {
                if let Ok(mut subs) = registry.lock() {
                    subs.remove(&id);
                }
            }),
        )
    }
}
