//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A variant's
/// physical dimensions or a hex color are value objects; a variant itself is
/// an entity (it has an id that survives edits).
///
/// To "modify" a value object, build a new one with the new values.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct WeightSpec { value: f64, unit: WeightUnit }
///
/// impl ValueObject for WeightSpec {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
