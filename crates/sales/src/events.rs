use serde::{Deserialize, Serialize};

use storefront_core::CustomerId;
use storefront_events::Event;

use crate::item::ProductId;
use crate::order::OrderId;

/// Event: DraftOrderStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrderStarted {
    pub customer_id: CustomerId,
    pub order_id: OrderId,
}

/// Event: OrderItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemAdded {
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

/// Event: OrderItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemUpdated {
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Event: OrderItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemRemoved {
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub product_id: ProductId,
}

/// Event: OrderVoucherApplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderVoucherApplied {
    pub customer_id: CustomerId,
    pub order_id: OrderId,
    pub voucher_code: String,
}

/// State-change notices emitted by order mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    DraftOrderStarted(DraftOrderStarted),
    OrderItemAdded(OrderItemAdded),
    OrderItemUpdated(OrderItemUpdated),
    OrderItemRemoved(OrderItemRemoved),
    OrderVoucherApplied(OrderVoucherApplied),
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::DraftOrderStarted(_) => "sales.order.draft_started",
            OrderEvent::OrderItemAdded(_) => "sales.order.item_added",
            OrderEvent::OrderItemUpdated(_) => "sales.order.item_updated",
            OrderEvent::OrderItemRemoved(_) => "sales.order.item_removed",
            OrderEvent::OrderVoucherApplied(_) => "sales.order.voucher_applied",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}
