use serde::{Deserialize, Serialize};

use storefront_core::{AggregateId, DomainError, DomainResult, Entity};

use crate::order::Order;

/// Product identifier, as carried by order items.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order item: product, display name, quantity, unit price.
///
/// Identity is the product; an order holds at most one item per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    product_name: String,
    quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    unit_price: u64,
}

impl OrderItem {
    /// Build an item, rejecting quantities below [`Order::MIN_ITEM_UNITS`].
    ///
    /// The upper bound is not checked here: the per-product cap applies to
    /// the combined quantity and is enforced by the owning order.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: u64,
    ) -> DomainResult<Self> {
        if quantity < Order::MIN_ITEM_UNITS {
            return Err(DomainError::validation(format!(
                "an item needs at least {} unit",
                Order::MIN_ITEM_UNITS
            )));
        }

        Ok(Self {
            product_id,
            product_name: product_name.into(),
            quantity,
            unit_price,
        })
    }

    /// Increase the quantity. No bound check here; the owning order checks
    /// the per-product cap before merging.
    pub fn add_units(&mut self, units: u32) {
        self.quantity += units;
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// Line total: quantity times unit price.
    ///
    /// Fails when the product does not fit the money type.
    pub fn line_total(&self) -> DomainResult<u64> {
        u64::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or_else(|| DomainError::invariant("order item amount overflow"))
    }
}

impl Entity for OrderItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    #[test]
    fn item_below_minimum_units_is_rejected() {
        let err = OrderItem::new(test_product_id(), "Test Product", 0, 100).unwrap_err();

        match err {
            DomainError::Validation(msg) if msg.contains("at least 1 unit") => {}
            _ => panic!("Expected Validation error for zero quantity"),
        }
    }

    #[test]
    fn line_total_is_quantity_times_unit_price() {
        let item = OrderItem::new(test_product_id(), "Test Product", 3, 250).unwrap();
        assert_eq!(item.line_total().unwrap(), 750);
    }

    #[test]
    fn line_total_past_the_money_type_is_reported() {
        let item = OrderItem::new(test_product_id(), "Test Product", 2, u64::MAX).unwrap();

        let err = item.line_total().unwrap_err();

        match err {
            DomainError::InvariantViolation(msg) if msg.contains("overflow") => {}
            _ => panic!("Expected InvariantViolation for overflowing line total"),
        }
    }

    #[test]
    fn add_units_accumulates() {
        let mut item = OrderItem::new(test_product_id(), "Test Product", 2, 100).unwrap();

        item.add_units(3);

        assert_eq!(item.quantity(), 5);
        assert_eq!(item.line_total().unwrap(), 500);
    }
}
