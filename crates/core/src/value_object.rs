//! Value objects: compared by value, no identity.
//!
//! Units of measure, component requirements and stock shortages are value
//! objects; two shortages with the same figures are the same shortage.

/// Marker trait for immutable, value-compared domain types.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
