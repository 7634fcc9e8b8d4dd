//! Slot: one cell of the backing store and its lifecycle.
//!
//! `Empty -> Active` on insert, `Active -> Deleted` on remove, and a
//! `Deleted` slot may become `Active` again when an insert lands on it.
//! A tombstone keeps its element; probes compare against it like any other
//! occupied slot but never report it as present.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot<T> {
    Empty,
    Active(T),
    Deleted(T),
}

impl<T> Slot<T> {
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        matches!(self, Slot::Active(_))
    }

    /// Turn an `Active` slot into a tombstone in place. Returns false for
    /// any other state.
    pub(crate) fn bury(&mut self) -> bool {
        match core::mem::replace(self, Slot::Empty) {
            Slot::Active(x) => {
                *self = Slot::Deleted(x);
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    pub(crate) fn into_active(self) -> Option<T> {
        match self {
            Slot::Active(x) => Some(x),
            _ => None,
        }
    }
}
