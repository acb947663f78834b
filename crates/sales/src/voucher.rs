use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{ValidationReport, ValueObject};

/// How a voucher discounts the order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoucherDiscountKind {
    FixedAmount,
    Percentage,
}

/// Applicability rule messages, one per rule.
pub mod applicability {
    pub const CODE_INVALID: &str = "this voucher has no valid code";
    pub const EXPIRED: &str = "this voucher has expired";
    pub const INACTIVE: &str = "this voucher is no longer valid";
    pub const ALREADY_USED: &str = "this voucher has already been used";
    pub const DEPLETED: &str = "this voucher is no longer available";
    pub const AMOUNT_NOT_POSITIVE: &str = "the discount amount must be greater than 0";
    pub const PERCENT_NOT_POSITIVE: &str = "the discount percentage must be greater than 0";
}

/// Discount voucher attached to an order.
///
/// Vouchers arrive fully formed from the outside and are never mutated by
/// the order. Redemption bookkeeping (decrementing `quantity`, flipping
/// `used`) belongs to whoever owns the voucher pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voucher {
    pub code: String,
    pub discount_kind: VoucherDiscountKind,
    /// Discount in smallest currency unit; set for `FixedAmount` vouchers.
    pub amount: Option<u64>,
    /// Whole-number percentage; set for `Percentage` vouchers.
    pub percent: Option<u64>,
    /// Remaining redemptions.
    pub quantity: u32,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
    pub used: bool,
}

impl Voucher {
    /// Evaluate every applicability rule against `now`.
    ///
    /// Inapplicability is an expected outcome, not an error: every rule is
    /// checked and the report carries one message per failed rule. A voucher
    /// expiring exactly at `now` is still applicable.
    pub fn validate_applicability(&self, now: DateTime<Utc>) -> ValidationReport {
        let mut report = ValidationReport::valid();

        report.check(!self.code.is_empty(), applicability::CODE_INVALID);
        report.check(self.expires_at >= now, applicability::EXPIRED);
        report.check(self.active, applicability::INACTIVE);
        report.check(!self.used, applicability::ALREADY_USED);
        report.check(self.quantity > 0, applicability::DEPLETED);

        match self.discount_kind {
            VoucherDiscountKind::FixedAmount => {
                report.check(
                    self.amount.is_some_and(|amount| amount > 0),
                    applicability::AMOUNT_NOT_POSITIVE,
                );
            }
            VoucherDiscountKind::Percentage => {
                report.check(
                    self.percent.is_some_and(|percent| percent > 0),
                    applicability::PERCENT_NOT_POSITIVE,
                );
            }
        }

        report
    }
}

impl ValueObject for Voucher {}
