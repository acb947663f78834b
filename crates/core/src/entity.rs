//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities live inside an aggregate and are told apart by identity, not by
/// attribute values (an order line keeps its identity while its quantity
/// changes).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
