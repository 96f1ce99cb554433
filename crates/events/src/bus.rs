//! Event publishing/subscription abstraction (mechanics only).
//!
//! A small pub/sub contract for distributing committed events to consumers
//! (the presentation layer, reconciliation workers, tests).
//!
//! - **Broadcast semantics**: each subscriber gets a copy of every event
//!   published after it subscribed.
//! - **At-least-once delivery**: consumers must be idempotent.
//! - **Ordering**: events published by a single serialized publisher arrive
//!   in publish order per subscriber.
//! - **No persistence**: the bus distributes, the ledger stores.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A live subscription to an event stream.
///
/// The subscription is an explicit handle: while held, events are delivered
/// to it; dropping it detaches the subscriber from the bus, so a consumer
/// that resubscribes never sees duplicate deliveries from a stale
/// registration. Detach is guaranteed on drop, including on unwind.
pub struct Subscription<M> {
    receiver: Receiver<M>,
    detach: Option<DetachFn>,
}

type DetachFn = Box<dyn FnOnce() + Send>;

impl<M> core::fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish_non_exhaustive()
    }
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>, detach: DetachFn) -> Self {
        Self {
            receiver,
            detach: Some(detach),
        }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

impl<M> Drop for Subscription<M> {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// `publish` fans a message out to all current subscribers; `subscribe`
/// registers a new consumer and hands back its `Subscription` handle.
/// Implementations must be safe to share across threads.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
