//! In-memory bus for tests/dev.

use std::sync::{Mutex, mpsc};

use crate::bus::{EventBus, Subscription};

#[derive(Debug)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Best-effort fan-out
/// - Subscribers that went away are dropped while publishing
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(message.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_a_copy() {
        let bus = InMemoryEventBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        bus.publish("notice".to_string()).unwrap();

        assert_eq!(first.try_recv().unwrap(), "notice");
        assert_eq!(second.try_recv().unwrap(), "notice");
    }

    #[test]
    fn publish_outlives_dropped_subscribers() {
        let bus = InMemoryEventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(1u32).unwrap();
        bus.publish(2u32).unwrap();

        assert_eq!(kept.try_recv().unwrap(), 1);
        assert_eq!(kept.try_recv().unwrap(), 2);
        assert!(kept.try_recv().is_err());
    }

    #[test]
    fn messages_arrive_in_publish_order() {
        let bus = InMemoryEventBus::new();
        let sub = bus.subscribe();

        for n in 0..5u32 {
            bus.publish(n).unwrap();
        }

        let received: Vec<u32> = std::iter::from_fn(|| sub.try_recv().ok()).collect();
        assert_eq!(received, [0, 1, 2, 3, 4]);
    }
}
