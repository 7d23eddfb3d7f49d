//! Entity trait: a record with a stable identity.

/// Entity marker + minimal interface.
///
/// Stores key records by this identity; it never changes once assigned.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
