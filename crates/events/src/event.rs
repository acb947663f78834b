/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - produced by aggregate mutations and fanned out after the change is
///   persisted
///
/// Events carry no clock of their own; emission time is recorded by the
/// notification layer when a fact is published.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "sales.order.item_added").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;
}
