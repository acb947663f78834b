//! Sales order (cart) domain module.
//!
//! This crate contains the business rules for customer draft orders,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no
//! storage). Persistence is reached only through the [`OrderRepository`]
//! port.

pub mod commands;
pub mod events;
pub mod item;
pub mod order;
pub mod repository;
pub mod voucher;

pub use commands::{AddOrderItem, ApplyOrderVoucher};
pub use events::{
    DraftOrderStarted, OrderEvent, OrderItemAdded, OrderItemRemoved, OrderItemUpdated,
    OrderVoucherApplied,
};
pub use item::{OrderItem, ProductId};
pub use order::{Order, OrderId, OrderStatus};
pub use repository::{OrderRepository, OrderStoreError};
pub use voucher::{Voucher, VoucherDiscountKind};
