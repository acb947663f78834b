//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A voucher is
/// the canonical example here: two vouchers with the same code, discount and
/// validity window are the same voucher as far as the domain cares. To
/// "modify" a value object, build a new one.
///
/// The trait requires:
/// - **Clone**: value objects are passed around and stored by copy
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: debuggable (logging, test assertions)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
