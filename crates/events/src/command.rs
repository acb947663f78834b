use storefront_core::ValidationReport;

/// A self-validating application command.
///
/// Commands represent **intent** - a request to perform an action on an
/// aggregate. They are **transient** (not persisted) and are transformed
/// into events once accepted.
///
/// ## Command vs Event
///
/// - **Command**: Intent to do something (e.g., "Add 2 units of product X")
/// - **Event**: Fact that something happened (e.g., "OrderItemAdded { quantity: 2 }")
///
/// Commands are rejected if invalid. Events represent accepted changes.
///
/// ## Self-validation
///
/// A command checks its own structure (required identifiers, ranges,
/// non-empty fields) before any aggregate is loaded. The check evaluates
/// every rule and reports all violations at once; the application layer
/// publishes one notification per violation and stops.
///
/// ## Design Constraints
///
/// Commands must be:
/// - **Cloneable**: Commands may be copied for retries, logging, etc.
/// - **Send + Sync + 'static**: Commands cross thread boundaries and must
///   own all their data.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable command name. Used as the notification key when the command
    /// or the domain rejects the request.
    fn message_type(&self) -> &'static str;

    /// Evaluate every structural rule of the command.
    fn validate(&self) -> ValidationReport;
}
