//! Accumulating validation outcome for reportable business rules.

use serde::{Deserialize, Serialize};

/// Outcome of evaluating a set of business rules.
///
/// Rules are not short-circuited: every rule is evaluated and every failure
/// is recorded, so callers can surface the complete picture at once (e.g.
/// one notification per violation).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<String>,
}

impl ValidationReport {
    /// An empty (passing) report.
    pub fn valid() -> Self {
        Self::default()
    }

    /// Record `message` as a violation when `condition` does not hold.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) {
        if !condition {
            self.violations.push(message.into());
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violation messages, in rule evaluation order.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Whether the report contains `message` verbatim.
    pub fn has(&self, message: &str) -> bool {
        self.violations.iter().any(|v| v == message)
    }
}
