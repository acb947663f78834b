use std::sync::Arc;

use thiserror::Error;

use storefront_core::{CustomerId, ExpectedVersion};

use crate::order::Order;

/// Errors surfaced by order persistence adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderStoreError {
    /// The optimistic concurrency check failed (stale expected version).
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// No stored order matched the write.
    #[error("order not found")]
    NotFound,

    /// An order with the same identity is already stored.
    #[error("duplicate order: {0}")]
    Duplicate(String),

    /// The backing store is unusable (e.g. poisoned lock).
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Persistence port for orders.
///
/// The core stores and retrieves whole aggregates; durability, indexing and
/// transactions are the adapter's business. `commit` flushes the unit of
/// work and reports whether the flush succeeded.
pub trait OrderRepository: Send + Sync {
    /// The customer's open draft order, if any.
    fn find_draft_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Order>, OrderStoreError>;

    /// Store a new order.
    fn insert(&self, order: &Order) -> Result<(), OrderStoreError>;

    /// Replace a stored order, subject to the version expectation.
    fn update(&self, order: &Order, expected: ExpectedVersion) -> Result<(), OrderStoreError>;

    /// Flush the unit of work.
    fn commit(&self) -> Result<bool, OrderStoreError>;
}

impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    fn find_draft_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Order>, OrderStoreError> {
        (**self).find_draft_by_customer(customer_id)
    }

    fn insert(&self, order: &Order) -> Result<(), OrderStoreError> {
        (**self).insert(order)
    }

    fn update(&self, order: &Order, expected: ExpectedVersion) -> Result<(), OrderStoreError> {
        (**self).update(order, expected)
    }

    fn commit(&self) -> Result<bool, OrderStoreError> {
        (**self).commit()
    }
}
