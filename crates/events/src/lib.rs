//! `storefront-events` — messaging abstractions.
//!
//! Events, self-validating commands, domain notifications, and the pub/sub
//! bus that fans notices out to subscribers.

pub mod bus;
pub mod command;
pub mod event;
pub mod in_memory_bus;
pub mod notification;

pub use bus::{EventBus, Subscription};
pub use command::Command;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notification::DomainNotification;
