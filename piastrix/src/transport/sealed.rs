//! Sealed trait marker for Transport implementations.

pub(crate) mod private {
    /// Sealed trait marker.
    ///
    /// Only types in this crate can implement `Transport`.
    pub trait Sealed {}
}
