use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{
    AggregateId, AggregateRoot, CustomerId, DomainError, DomainResult, ValidationReport,
};

use crate::events::{OrderEvent, OrderItemAdded, OrderItemRemoved, OrderItemUpdated};
use crate::item::{OrderItem, ProductId};
use crate::voucher::{Voucher, VoucherDiscountKind};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
///
/// Only `Draft` is exercised by the cart flows; the remaining states belong
/// to checkout and fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Draft,
    Submitted,
    Paid,
    Cancelled,
}

/// Aggregate root: a customer's order (the cart, while still a draft).
///
/// Every mutation is all-or-nothing: rules are checked and the new totals
/// computed before any state is touched. Successful item mutations return
/// the notices describing what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    customer_id: CustomerId,
    status: OrderStatus,
    /// Sum of the item line totals, before any discount.
    gross: u64,
    total: u64,
    discount: u64,
    voucher_used: bool,
    voucher: Option<Voucher>,
    items: Vec<OrderItem>,
    version: u64,
}

impl Order {
    /// Most units of a single product an order may hold, combined across
    /// add and update operations.
    pub const MAX_ITEM_UNITS: u32 = 15;

    /// Fewest units an item may carry.
    pub const MIN_ITEM_UNITS: u32 = 1;

    /// Start an empty draft order for a customer.
    pub fn new_draft(customer_id: CustomerId) -> Self {
        Self {
            id: OrderId::new(AggregateId::new()),
            customer_id,
            status: OrderStatus::Draft,
            gross: 0,
            total: 0,
            discount: 0,
            voucher_used: false,
            voucher: None,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Payable total after any voucher discount, floored at zero.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Discount derived from the voucher at the last recomputation. Keeps
    /// the computed value even when the total was floored at zero.
    pub fn discount(&self) -> u64 {
        self.discount
    }

    pub fn voucher_used(&self) -> bool {
        self.voucher_used
    }

    pub fn voucher(&self) -> Option<&Voucher> {
        self.voucher.as_ref()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn is_draft(&self) -> bool {
        matches!(self.status, OrderStatus::Draft)
    }

    /// Item lookup, strictly by product identity.
    pub fn find_item(&self, product_id: ProductId) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    pub fn has_item(&self, product_id: ProductId) -> bool {
        self.find_item(product_id).is_some()
    }

    /// Add an item, merging quantities when the product is already present.
    ///
    /// A merged entry keeps the stored name and unit price and moves to the
    /// tail of the item list. The emitted notice carries the incoming
    /// (requested) fields.
    pub fn add_item(&mut self, item: OrderItem) -> DomainResult<Vec<OrderEvent>> {
        self.ensure_units_within_cap(&item)?;

        let event = OrderEvent::OrderItemAdded(OrderItemAdded {
            customer_id: self.customer_id,
            order_id: self.id,
            product_id: item.product_id(),
            product_name: item.product_name().to_string(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
        });

        let mut items = self.items.clone();
        match self.item_index(item.product_id()) {
            Some(index) => {
                let mut merged = items.remove(index);
                merged.add_units(item.quantity());
                items.push(merged);
            }
            None => items.push(item),
        }
        self.commit_items(items)?;

        Ok(vec![event])
    }

    /// Replace an existing item with the incoming one.
    ///
    /// The cap is re-checked against the stored quantity plus the incoming
    /// quantity, so updates near the cap are rejected more eagerly than
    /// adds of the same size.
    pub fn update_item(&mut self, item: OrderItem) -> DomainResult<Vec<OrderEvent>> {
        let index = match self.item_index(item.product_id()) {
            Some(index) => index,
            None => return Err(DomainError::not_found()),
        };
        self.ensure_units_within_cap(&item)?;

        let event = OrderEvent::OrderItemUpdated(OrderItemUpdated {
            customer_id: self.customer_id,
            order_id: self.id,
            product_id: item.product_id(),
            quantity: item.quantity(),
        });

        let mut items = self.items.clone();
        items.remove(index);
        items.push(item);
        self.commit_items(items)?;

        Ok(vec![event])
    }

    /// Remove an item by product identity.
    pub fn remove_item(&mut self, item: &OrderItem) -> DomainResult<Vec<OrderEvent>> {
        let index = match self.item_index(item.product_id()) {
            Some(index) => index,
            None => return Err(DomainError::not_found()),
        };

        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.commit_items(items)?;

        Ok(vec![OrderEvent::OrderItemRemoved(OrderItemRemoved {
            customer_id: self.customer_id,
            order_id: self.id,
            product_id: removed.product_id(),
        })])
    }

    /// Attach a voucher and rework the discount.
    ///
    /// Applicability is reported, never raised: the full report is returned
    /// in both outcomes, and an inapplicable voucher leaves the order
    /// untouched. Applying a new voucher replaces the previous one as the
    /// discount basis.
    pub fn apply_voucher(&mut self, voucher: Voucher, now: DateTime<Utc>) -> ValidationReport {
        let report = voucher.validate_applicability(now);
        if !report.is_valid() {
            return report;
        }

        self.voucher = Some(voucher);
        self.voucher_used = true;
        // The discount basis is always the gross item total, so a
        // replacement voucher never compounds on a discounted total.
        self.recalculate_totals();
        self.version += 1;

        report
    }

    fn item_index(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.product_id() == product_id)
    }

    fn ensure_units_within_cap(&self, incoming: &OrderItem) -> DomainResult<()> {
        let mut units = u64::from(incoming.quantity());
        if let Some(existing) = self.find_item(incoming.product_id()) {
            units += u64::from(existing.quantity());
        }

        if units > u64::from(Self::MAX_ITEM_UNITS) {
            return Err(DomainError::invariant(format!(
                "no more than {} units of a single product per order",
                Self::MAX_ITEM_UNITS
            )));
        }

        Ok(())
    }

    /// Sum of the item line totals, with checked money arithmetic.
    fn checked_gross(items: &[OrderItem]) -> DomainResult<u64> {
        let mut gross = 0u64;
        for item in items {
            gross = gross
                .checked_add(item.line_total()?)
                .ok_or_else(|| DomainError::invariant("order total overflow"))?;
        }
        Ok(gross)
    }

    /// Store a prospective item list and recompute the totals from it.
    ///
    /// The gross is validated before anything is stored, so an amount past
    /// the money type leaves the order untouched.
    fn commit_items(&mut self, items: Vec<OrderItem>) -> DomainResult<()> {
        let gross = Self::checked_gross(&items)?;

        self.items = items;
        self.gross = gross;
        self.recalculate_totals();
        self.version += 1;

        Ok(())
    }

    /// Re-derive the discount and the payable total from the gross total.
    ///
    /// The total is floored at zero; the discount field keeps the computed
    /// value even when it exceeds the gross total.
    fn recalculate_totals(&mut self) {
        let gross = self.gross;
        let mut discount = 0u64;

        if self.voucher_used {
            if let Some(voucher) = self.voucher.as_ref() {
                match voucher.discount_kind {
                    VoucherDiscountKind::FixedAmount => {
                        if let Some(amount) = voucher.amount {
                            discount = amount;
                        }
                    }
                    VoucherDiscountKind::Percentage => {
                        if let Some(percent) = voucher.percent {
                            discount = percentage_of(gross, percent);
                        }
                    }
                }
            }
        }

        self.total = gross.saturating_sub(discount);
        self.discount = discount;
    }
}

/// `percent`% of `amount`, widened so the multiply cannot overflow.
fn percentage_of(amount: u64, percent: u64) -> u64 {
    let wide = u128::from(amount) * u128::from(percent) / 100;
    u64::try_from(wide).unwrap_or(u64::MAX)
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
