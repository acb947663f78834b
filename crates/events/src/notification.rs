use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::ValidationReport;

/// A keyed notice raised while handling a command.
///
/// Notifications carry rejected-rule messages to whatever sink is
/// subscribed. They are fire-and-forget: the producer never waits on
/// delivery or consumes a result.
///
/// Notes:
/// - `key` groups notices from one handling attempt (the command name).
/// - `raised_at` is emission time, stamped by the producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainNotification {
    notification_id: Uuid,
    key: String,
    value: String,

    /// Schema version of the notification payload.
    schema_version: u32,

    raised_at: DateTime<Utc>,
}

impl DomainNotification {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            notification_id: Uuid::now_v7(),
            key: key.into(),
            value: value.into(),
            schema_version: 1,
            raised_at: Utc::now(),
        }
    }

    /// One notification per violation, all sharing `key`.
    pub fn from_report(key: &str, report: &ValidationReport) -> Vec<Self> {
        report
            .violations()
            .iter()
            .map(|violation| Self::new(key, violation.clone()))
            .collect()
    }

    pub fn notification_id(&self) -> Uuid {
        self.notification_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn raised_at(&self) -> DateTime<Utc> {
        self.raised_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_expands_to_one_notification_per_violation() {
        let mut report = ValidationReport::valid();
        report.check(false, "voucher code is missing");
        report.check(false, "voucher has expired");

        let notifications = DomainNotification::from_report("apply_order_voucher", &report);

        assert_eq!(notifications.len(), 2);
        assert!(notifications.iter().all(|n| n.key() == "apply_order_voucher"));
        assert_eq!(notifications[0].value(), "voucher code is missing");
        assert_eq!(notifications[1].value(), "voucher has expired");
    }

    #[test]
    fn passing_report_expands_to_nothing() {
        let report = ValidationReport::valid();
        assert!(DomainNotification::from_report("add_order_item", &report).is_empty());
    }
}
