//! In-memory order store.
//!
//! Implements the [`OrderRepository`] port over a `RwLock`-guarded map.
//! Suitable for tests and development; nothing survives a restart.

use std::collections::HashMap;
use std::sync::RwLock;

use storefront_core::{AggregateRoot, CustomerId, ExpectedVersion};
use storefront_sales::{Order, OrderId, OrderRepository, OrderStoreError};

/// Thread-safe in-memory [`OrderRepository`] adapter.
///
/// Writes land immediately under the lock; `commit` only reports that the
/// unit of work flushed. Optimistic concurrency is enforced on `update` by
/// comparing the stored aggregate version against the caller's expectation.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
        }
    }

    /// Direct lookup by order id. Test and diagnostics convenience, not part
    /// of the repository port.
    pub fn get(&self, order_id: OrderId) -> Option<Order> {
        let orders = self.orders.read().ok()?;
        orders.get(&order_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|orders| orders.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderRepository for InMemoryOrderStore {
    fn find_draft_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Order>, OrderStoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| OrderStoreError::Storage("lock poisoned".to_string()))?;

        Ok(orders
            .values()
            .find(|order| order.is_draft() && order.customer_id() == customer_id)
            .cloned())
    }

    fn insert(&self, order: &Order) -> Result<(), OrderStoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderStoreError::Storage("lock poisoned".to_string()))?;

        let order_id = order.id_typed();
        if orders.contains_key(&order_id) {
            return Err(OrderStoreError::Duplicate(format!(
                "order {order_id} already stored"
            )));
        }

        orders.insert(order_id, order.clone());
        Ok(())
    }

    fn update(&self, order: &Order, expected: ExpectedVersion) -> Result<(), OrderStoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderStoreError::Storage("lock poisoned".to_string()))?;

        let order_id = order.id_typed();
        let current = match orders.get(&order_id) {
            Some(stored) => stored.version(),
            None => return Err(OrderStoreError::NotFound),
        };

        if !expected.matches(current) {
            return Err(OrderStoreError::Concurrency(format!(
                "expected {expected:?}, found {current}"
            )));
        }

        orders.insert(order_id, order.clone());
        Ok(())
    }

    fn commit(&self) -> Result<bool, OrderStoreError> {
        // Writes are already visible; the in-memory flush cannot fail.
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::{AggregateId, CustomerId};
    use storefront_sales::{OrderItem, ProductId};

    fn test_customer() -> CustomerId {
        CustomerId::new()
    }

    fn draft_with_one_item(customer_id: CustomerId) -> Order {
        let mut order = Order::new_draft(customer_id);
        let item = OrderItem::new(
            ProductId::new(AggregateId::new()),
            "Keyboard",
            2,
            4_500,
        )
        .unwrap();
        order.add_item(item).unwrap();
        order
    }

    #[test]
    fn insert_and_find_draft_roundtrip() {
        let store = InMemoryOrderStore::new();
        let customer = test_customer();
        let order = draft_with_one_item(customer);

        store.insert(&order).unwrap();

        let found = store.find_draft_by_customer(customer).unwrap().unwrap();
        assert_eq!(found, order);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_returns_none_for_unknown_customer() {
        let store = InMemoryOrderStore::new();
        let order = draft_with_one_item(test_customer());
        store.insert(&order).unwrap();

        assert!(store.find_draft_by_customer(test_customer()).unwrap().is_none());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let store = InMemoryOrderStore::new();
        let order = draft_with_one_item(test_customer());

        store.insert(&order).unwrap();

        assert!(matches!(
            store.insert(&order),
            Err(OrderStoreError::Duplicate(_))
        ));
    }

    #[test]
    fn update_of_unknown_order_is_rejected() {
        let store = InMemoryOrderStore::new();
        let order = draft_with_one_item(test_customer());

        assert!(matches!(
            store.update(&order, ExpectedVersion::Any),
            Err(OrderStoreError::NotFound)
        ));
    }

    #[test]
    fn stale_version_update_is_rejected() {
        let store = InMemoryOrderStore::new();
        let customer = test_customer();
        let mut order = draft_with_one_item(customer);
        store.insert(&order).unwrap();

        let item = OrderItem::new(ProductId::new(AggregateId::new()), "Mouse", 1, 1_500).unwrap();
        order.add_item(item).unwrap();

        // The store still holds version 1; claiming to have seen version 0
        // must fail the optimistic check.
        assert!(matches!(
            store.update(&order, ExpectedVersion::Exact(0)),
            Err(OrderStoreError::Concurrency(_))
        ));

        store.update(&order, ExpectedVersion::Exact(1)).unwrap();
        let stored = store.get(order.id_typed()).unwrap();
        assert_eq!(stored.items().len(), 2);
    }

    #[test]
    fn any_version_update_always_passes_the_check() {
        let store = InMemoryOrderStore::new();
        let customer = test_customer();
        let mut order = draft_with_one_item(customer);
        store.insert(&order).unwrap();

        let item = OrderItem::new(ProductId::new(AggregateId::new()), "Mouse", 1, 1_500).unwrap();
        order.add_item(item).unwrap();

        store.update(&order, ExpectedVersion::Any).unwrap();
        assert_eq!(store.get(order.id_typed()).unwrap(), order);
    }

    #[test]
    fn commit_reports_success() {
        let store = InMemoryOrderStore::new();
        assert!(store.commit().unwrap());
    }
}
