//! Command execution pipeline (application-level orchestration).
//!
//! This module wires commands to the order aggregate. It orchestrates the
//! full lifecycle: validating the command, loading (or starting) the
//! customer's draft, mutating it, persisting through the repository port,
//! and publishing the resulting messages to the sink.
//!
//! ## Command Execution Flow
//!
//! The `OrderCommandHandler` implements this pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Self-validate the command (structural rules, no state needed)
//!   ↓
//! 2. Load the customer's draft order (or start a fresh one)
//!   ↓
//! 3. Mutate the aggregate (domain rules, totals recomputed inside)
//!   ↓
//! 4. Persist (insert or update with optimistic concurrency check)
//!   ↓
//! 5. Commit, then publish notices to the sink
//! ```
//!
//! ## Failure Reporting
//!
//! The handler returns `bool`: whether the command was carried out and
//! committed. Expected failures never panic and never raise; each one
//! becomes a [`DomainNotification`] on the sink so interested parties can
//! react:
//!
//! - Command self-validation failures publish one notification **per failed
//!   rule**, keyed by the command's message type
//! - Domain rejections (unit ceiling, unknown item) publish the domain
//!   error message
//! - Voucher inapplicability publishes one notification per failed
//!   applicability rule
//!
//! Infrastructure failures (storage, commit) are logged and reported as
//! `false`; they are operational conditions, not business outcomes.
//!
//! ## Publication Semantics
//!
//! The sink is fire-and-forget. Events are published only **after** a
//! successful commit, so subscribers never observe a state change that was
//! rolled back. A publish failure is logged and swallowed; it does not fail
//! the already-committed command.

use chrono::Utc;
use tracing::{debug, error, warn};

use storefront_core::{AggregateRoot, ExpectedVersion, ValidationReport};
use storefront_events::{Command, DomainNotification, EventBus};
use storefront_sales::{
    AddOrderItem, ApplyOrderVoucher, DraftOrderStarted, Order, OrderEvent, OrderItem,
    OrderRepository, OrderVoucherApplied,
};

/// Published when a voucher command arrives for a customer with no open
/// draft order.
pub const NO_DRAFT_ORDER: &str = "there is no draft order to apply the voucher to";

/// Union of everything the handler puts on the sink.
///
/// Subscribers receive state-change notices and rejection notifications over
/// the same subscription, in publish order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderMessage {
    Notification(DomainNotification),
    Event(OrderEvent),
}

/// Synchronous command handler for the order aggregate.
///
/// ## Architecture Role
///
/// The handler sits between the caller (UI, message consumer, test) and the
/// infrastructure layer (repository, sink). Domain code stays pure; every
/// side effect goes through the two injected ports.
///
/// ## Execution Guarantees
///
/// - **Atomicity**: nothing is persisted when the aggregate rejects the
///   mutation, and nothing is published before the commit succeeds
/// - **Concurrency**: updates carry the version observed at load time, so a
///   concurrent writer fails the optimistic check instead of being lost
/// - **Isolation**: each command touches a single draft order
///
/// ## Generic Parameters
///
/// - `R`: repository implementation (any [`OrderRepository`])
/// - `B`: sink implementation (any [`EventBus`] over [`OrderMessage`])
///
/// In-memory implementations of both make the handler fully testable
/// without external services.
#[derive(Debug)]
pub struct OrderCommandHandler<R, B> {
    repository: R,
    sink: B,
}

impl<R, B> OrderCommandHandler<R, B> {
    pub fn new(repository: R, sink: B) -> Self {
        Self { repository, sink }
    }

    pub fn into_parts(self) -> (R, B) {
        (self.repository, self.sink)
    }
}

impl<R, B> OrderCommandHandler<R, B>
where
    R: OrderRepository,
    B: EventBus<OrderMessage>,
{
    /// Add units of a product to the customer's draft order, starting a
    /// fresh draft when none is open.
    ///
    /// Adding a product already in the order merges the quantities into the
    /// existing entry (the aggregate enforces the per-product ceiling on the
    /// combined count). Returns whether the change was committed.
    pub fn handle_add_item(&self, command: AddOrderItem) -> bool {
        let report = command.validate();
        if !report.is_valid() {
            debug!(
                message_type = command.message_type(),
                violations = report.violations().len(),
                "command rejected by self-validation"
            );
            self.notify_report(command.message_type(), &report);
            return false;
        }

        let item = match OrderItem::new(
            command.product_id,
            command.product_name.clone(),
            command.quantity,
            command.unit_price,
        ) {
            Ok(item) => item,
            Err(e) => {
                self.notify(command.message_type(), e.to_string());
                return false;
            }
        };

        let loaded = match self.repository.find_draft_by_customer(command.customer_id) {
            Ok(loaded) => loaded,
            Err(e) => {
                error!(customer_id = %command.customer_id, error = %e, "draft lookup failed");
                return false;
            }
        };

        // `None` marks a fresh draft (insert); `Some` carries the version
        // observed at load time for the optimistic update.
        let mut started = Vec::new();
        let (mut order, loaded_version) = match loaded {
            Some(order) => {
                let version = order.version();
                (order, Some(version))
            }
            None => {
                let order = Order::new_draft(command.customer_id);
                started.push(OrderEvent::DraftOrderStarted(DraftOrderStarted {
                    customer_id: command.customer_id,
                    order_id: order.id_typed(),
                }));
                (order, None)
            }
        };

        let events = match order.add_item(item) {
            Ok(events) => events,
            Err(e) => {
                debug!(order_id = %order.id_typed(), error = %e, "item rejected by the order");
                self.notify(command.message_type(), e.to_string());
                return false;
            }
        };

        if !self.persist(&order, loaded_version) {
            return false;
        }

        for event in started.into_iter().chain(events) {
            self.publish(OrderMessage::Event(event));
        }

        debug!(
            order_id = %order.id_typed(),
            total = order.total(),
            "order item accepted"
        );
        true
    }

    /// Apply a voucher to the customer's open draft order.
    ///
    /// Inapplicability is reported through the sink, one notification per
    /// failed rule, and leaves the stored order untouched. An applicable
    /// voucher replaces any previously applied one as the discount basis.
    pub fn handle_apply_voucher(&self, command: ApplyOrderVoucher) -> bool {
        let report = command.validate();
        if !report.is_valid() {
            self.notify_report(command.message_type(), &report);
            return false;
        }

        let loaded = match self.repository.find_draft_by_customer(command.customer_id) {
            Ok(loaded) => loaded,
            Err(e) => {
                error!(customer_id = %command.customer_id, error = %e, "draft lookup failed");
                return false;
            }
        };

        let mut order = match loaded {
            Some(order) => order,
            None => {
                debug!(customer_id = %command.customer_id, "voucher arrived without a draft");
                self.notify(command.message_type(), NO_DRAFT_ORDER);
                return false;
            }
        };
        let loaded_version = order.version();

        let report = order.apply_voucher(command.voucher.clone(), Utc::now());
        if !report.is_valid() {
            debug!(
                order_id = %order.id_typed(),
                violations = report.violations().len(),
                "voucher rejected as inapplicable"
            );
            self.notify_report(command.message_type(), &report);
            return false;
        }

        if !self.persist(&order, Some(loaded_version)) {
            return false;
        }

        self.publish(OrderMessage::Event(OrderEvent::OrderVoucherApplied(
            OrderVoucherApplied {
                customer_id: command.customer_id,
                order_id: order.id_typed(),
                voucher_code: command.voucher.code,
            },
        )));

        debug!(
            order_id = %order.id_typed(),
            total = order.total(),
            discount = order.discount(),
            "voucher applied"
        );
        true
    }

    /// Insert or update, then flush the unit of work.
    fn persist(&self, order: &Order, loaded_version: Option<u64>) -> bool {
        let persisted = match loaded_version {
            Some(version) => self.repository.update(order, ExpectedVersion::Exact(version)),
            None => self.repository.insert(order),
        };
        if let Err(e) = persisted {
            error!(order_id = %order.id_typed(), error = %e, "order persistence failed");
            return false;
        }

        match self.repository.commit() {
            Ok(true) => true,
            Ok(false) => {
                error!(order_id = %order.id_typed(), "commit reported failure");
                false
            }
            Err(e) => {
                error!(order_id = %order.id_typed(), error = %e, "commit failed");
                false
            }
        }
    }

    fn notify_report(&self, key: &str, report: &ValidationReport) {
        for notification in DomainNotification::from_report(key, report) {
            self.publish(OrderMessage::Notification(notification));
        }
    }

    fn notify(&self, key: &str, value: impl Into<String>) {
        self.publish(OrderMessage::Notification(DomainNotification::new(key, value)));
    }

    fn publish(&self, message: OrderMessage) {
        // Fire-and-forget: a sink failure never unwinds a committed command.
        if let Err(e) = self.sink.publish(message) {
            warn!(error = ?e, "order message publication failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;
    use uuid::Uuid;

    use storefront_core::{AggregateId, CustomerId};
    use storefront_events::{InMemoryEventBus, Subscription};
    use storefront_sales::{ProductId, Voucher, VoucherDiscountKind};

    use super::*;
    use crate::order_store::InMemoryOrderStore;

    fn setup() -> (
        OrderCommandHandler<Arc<InMemoryOrderStore>, Arc<InMemoryEventBus<OrderMessage>>>,
        Arc<InMemoryOrderStore>,
        Subscription<OrderMessage>,
    ) {
        let store = Arc::new(InMemoryOrderStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let subscription = bus.subscribe();
        let handler = OrderCommandHandler::new(store.clone(), bus);
        (handler, store, subscription)
    }

    fn drain(subscription: &Subscription<OrderMessage>) -> Vec<OrderMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = subscription.try_recv() {
            messages.push(message);
        }
        messages
    }

    fn add_item_command(
        customer_id: CustomerId,
        product_id: ProductId,
        quantity: u32,
        unit_price: u64,
    ) -> AddOrderItem {
        AddOrderItem {
            customer_id,
            product_id,
            product_name: "Mechanical Keyboard".to_string(),
            quantity,
            unit_price,
        }
    }

    fn fixed_voucher(amount: u64) -> Voucher {
        Voucher {
            code: "PROMO-FIXED".to_string(),
            discount_kind: VoucherDiscountKind::FixedAmount,
            amount: Some(amount),
            percent: None,
            quantity: 1,
            expires_at: Utc::now() + Duration::days(30),
            active: true,
            used: false,
        }
    }

    #[test]
    fn add_item_for_a_new_customer_starts_a_draft() {
        let (handler, store, subscription) = setup();
        let customer = CustomerId::new();
        let product = ProductId::new(AggregateId::new());

        let committed = handler.handle_add_item(add_item_command(customer, product, 2, 10_000));

        assert!(committed);
        let order = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.total(), 20_000);

        let messages = drain(&subscription);
        assert_eq!(messages.len(), 2);
        assert!(matches!(
            &messages[0],
            OrderMessage::Event(OrderEvent::DraftOrderStarted(started))
                if started.customer_id == customer
        ));
        assert!(matches!(
            &messages[1],
            OrderMessage::Event(OrderEvent::OrderItemAdded(added))
                if added.product_id == product && added.quantity == 2
        ));
    }

    #[test]
    fn add_item_to_an_existing_draft_keeps_one_order() {
        let (handler, store, subscription) = setup();
        let customer = CustomerId::new();

        assert!(handler.handle_add_item(add_item_command(
            customer,
            ProductId::new(AggregateId::new()),
            1,
            5_000
        )));
        drain(&subscription);

        assert!(handler.handle_add_item(add_item_command(
            customer,
            ProductId::new(AggregateId::new()),
            3,
            2_000
        )));

        assert_eq!(store.len(), 1);
        let order = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.total(), 11_000);

        // No second draft was started.
        let messages = drain(&subscription);
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            &messages[0],
            OrderMessage::Event(OrderEvent::OrderItemAdded(_))
        ));
    }

    #[test]
    fn adding_the_same_product_persists_the_merged_quantity() {
        let (handler, store, _subscription) = setup();
        let customer = CustomerId::new();
        let product = ProductId::new(AggregateId::new());

        assert!(handler.handle_add_item(add_item_command(customer, product, 4, 1_000)));
        assert!(handler.handle_add_item(add_item_command(customer, product, 6, 1_000)));

        let order = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert_eq!(order.items().len(), 1);
        assert_eq!(order.items()[0].quantity(), 10);
        assert_eq!(order.total(), 10_000);
    }

    #[test]
    fn invalid_command_publishes_one_notification_per_violation() {
        let (handler, store, subscription) = setup();
        let command = AddOrderItem {
            customer_id: CustomerId::from_uuid(Uuid::nil()),
            product_id: ProductId::new(AggregateId::from_uuid(Uuid::nil())),
            product_name: String::new(),
            quantity: 0,
            unit_price: 0,
        };

        let committed = handler.handle_add_item(command);

        assert!(!committed);
        assert!(store.is_empty());

        let messages = drain(&subscription);
        assert_eq!(messages.len(), 5);
        for message in &messages {
            match message {
                OrderMessage::Notification(notification) => {
                    assert_eq!(notification.key(), "add_order_item");
                }
                other => panic!("Expected a notification, got: {other:?}"),
            }
        }
    }

    #[test]
    fn ceiling_breach_is_notified_and_leaves_the_draft_untouched() {
        let (handler, store, subscription) = setup();
        let customer = CustomerId::new();
        let product = ProductId::new(AggregateId::new());

        assert!(handler.handle_add_item(add_item_command(customer, product, 10, 1_000)));
        drain(&subscription);

        let committed = handler.handle_add_item(add_item_command(customer, product, 10, 1_000));

        assert!(!committed);
        let order = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert_eq!(order.items()[0].quantity(), 10);
        assert_eq!(order.total(), 10_000);

        let messages = drain(&subscription);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            OrderMessage::Notification(notification) => {
                assert_eq!(notification.key(), "add_order_item");
                assert!(notification.value().contains("15"));
            }
            other => panic!("Expected a notification, got: {other:?}"),
        }
    }

    #[test]
    fn applicable_voucher_is_applied_and_persisted() {
        let (handler, store, subscription) = setup();
        let customer = CustomerId::new();
        let product = ProductId::new(AggregateId::new());

        assert!(handler.handle_add_item(add_item_command(customer, product, 5, 10_000)));
        drain(&subscription);

        let committed = handler.handle_apply_voucher(ApplyOrderVoucher {
            customer_id: customer,
            voucher: fixed_voucher(1_500),
        });

        assert!(committed);
        let order = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert!(order.voucher_used());
        assert_eq!(order.discount(), 1_500);
        assert_eq!(order.total(), 48_500);

        let messages = drain(&subscription);
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            &messages[0],
            OrderMessage::Event(OrderEvent::OrderVoucherApplied(applied))
                if applied.voucher_code == "PROMO-FIXED"
        ));
    }

    #[test]
    fn inapplicable_voucher_publishes_each_violation_and_persists_nothing() {
        let (handler, store, subscription) = setup();
        let customer = CustomerId::new();
        let product = ProductId::new(AggregateId::new());

        assert!(handler.handle_add_item(add_item_command(customer, product, 5, 10_000)));
        drain(&subscription);
        let before = store.find_draft_by_customer(customer).unwrap().unwrap();

        let mut voucher = fixed_voucher(1_500);
        voucher.active = false;
        voucher.used = true;

        let committed = handler.handle_apply_voucher(ApplyOrderVoucher {
            customer_id: customer,
            voucher,
        });

        assert!(!committed);
        let after = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert_eq!(after, before);

        let messages = drain(&subscription);
        assert_eq!(messages.len(), 2);
        let values: Vec<&str> = messages
            .iter()
            .map(|message| match message {
                OrderMessage::Notification(notification) => notification.value(),
                other => panic!("Expected a notification, got: {other:?}"),
            })
            .collect();
        assert!(values.contains(&"this voucher is no longer valid"));
        assert!(values.contains(&"this voucher has already been used"));
    }

    #[test]
    fn voucher_without_a_draft_is_notified() {
        let (handler, store, subscription) = setup();

        let committed = handler.handle_apply_voucher(ApplyOrderVoucher {
            customer_id: CustomerId::new(),
            voucher: fixed_voucher(1_500),
        });

        assert!(!committed);
        assert!(store.is_empty());

        let messages = drain(&subscription);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            OrderMessage::Notification(notification) => {
                assert_eq!(notification.value(), NO_DRAFT_ORDER);
            }
            other => panic!("Expected a notification, got: {other:?}"),
        }
    }
}
