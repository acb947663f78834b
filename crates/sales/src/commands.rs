use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, ValidationReport};
use storefront_events::Command;

use crate::item::ProductId;
use crate::order::Order;
use crate::voucher::Voucher;

/// Structural rule messages for [`AddOrderItem`].
pub mod add_item_rules {
    use crate::order::Order;

    pub const CUSTOMER_ID_INVALID: &str = "invalid customer id";
    pub const PRODUCT_ID_INVALID: &str = "invalid product id";
    pub const NAME_MISSING: &str = "the product name was not provided";
    pub const QUANTITY_BELOW_MIN: &str = "the minimum quantity of an item is 1";
    pub const PRICE_NOT_POSITIVE: &str = "the item price must be greater than 0";

    /// The cap message names the order-level constant.
    pub fn quantity_above_max() -> String {
        format!("the maximum quantity of an item is {}", Order::MAX_ITEM_UNITS)
    }
}

/// Structural rule messages for [`ApplyOrderVoucher`].
pub mod apply_voucher_rules {
    pub const CUSTOMER_ID_INVALID: &str = "invalid customer id";
}

/// Command: add units of a product to the customer's draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOrderItem {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl Command for AddOrderItem {
    fn message_type(&self) -> &'static str {
        "add_order_item"
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::valid();

        report.check(
            !self.customer_id.as_uuid().is_nil(),
            add_item_rules::CUSTOMER_ID_INVALID,
        );
        report.check(
            !self.product_id.0.as_uuid().is_nil(),
            add_item_rules::PRODUCT_ID_INVALID,
        );
        report.check(!self.product_name.is_empty(), add_item_rules::NAME_MISSING);
        report.check(
            self.quantity >= Order::MIN_ITEM_UNITS,
            add_item_rules::QUANTITY_BELOW_MIN,
        );
        report.check(
            self.quantity <= Order::MAX_ITEM_UNITS,
            add_item_rules::quantity_above_max(),
        );
        report.check(self.unit_price > 0, add_item_rules::PRICE_NOT_POSITIVE);

        report
    }
}

/// Command: apply an externally-sourced voucher to the customer's draft order.
///
/// The voucher arrives fully formed with the command; its applicability is a
/// domain concern and is checked by the order, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOrderVoucher {
    pub customer_id: CustomerId,
    pub voucher: Voucher,
}

impl Command for ApplyOrderVoucher {
    fn message_type(&self) -> &'static str {
        "apply_order_voucher"
    }

    fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::valid();

        report.check(
            !self.customer_id.as_uuid().is_nil(),
            apply_voucher_rules::CUSTOMER_ID_INVALID,
        );

        report
    }
}
