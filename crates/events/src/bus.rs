//! Notification publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern** - a pub/sub mechanism for
//! distributing notices (domain notifications, state-change events) to
//! whatever consumers care to listen.
//!
//! ## Design Philosophy
//!
//! The bus is intentionally **lightweight** and makes minimal assumptions:
//!
//! - **Transport-agnostic**: Works with in-memory channels, message queues, etc.
//! - **Fire-and-forget**: Producers never consume a delivery result
//! - **Best-effort fan-out**: A dead subscriber never blocks the producer
//! - **No persistence**: The bus is for distribution; the order store is the
//!   source of truth for state

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to a message stream.
///
/// Each subscription gets a copy of all messages published to the bus
/// (broadcast semantics).
///
/// ## Usage Pattern
///
/// ```ignore
/// let bus: Arc<InMemoryEventBus<OrderMessage>> = ...;
/// let subscription = bus.subscribe();
///
/// while let Ok(message) = subscription.try_recv() {
///     process(message);
/// }
/// ```
///
/// ## Thread Safety
///
/// Subscriptions are designed for single-threaded consumption. Each
/// subscription should be used by one thread.
///
/// ## Message Ordering
///
/// Messages are received in the order they were published by the bus
/// implementation. Ordering between concurrent publishers is not
/// guaranteed.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
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

/// Domain-agnostic pub/sub bus.
///
/// This is the notification sink of the application layer: rejected-rule
/// notices and state-change events are published here after persistence,
/// and whoever subscribed gets a copy.
///
/// ## Error Handling
///
/// `publish()` can fail (e.g. internal lock poisoned). Since handlers treat
/// the sink as fire-and-forget, failures are logged by the caller and never
/// affect the outcome of the command.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`; implementations must be safe to share
/// across threads, and multiple threads may publish concurrently.
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
