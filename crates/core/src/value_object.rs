//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** — two instances
/// with the same attributes are the same value. Derived read-model rows
/// (costing snapshots, report entries) are value objects: they carry no
/// identity of their own and can be recomputed from the ledger at any time.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
