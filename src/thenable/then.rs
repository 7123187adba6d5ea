//! # Thenable capability.
//!
//! [`Then`] is the capability "can deliver an eventual value or reason to a pair of
//! callbacks". Anything implementing it can be adopted by a
//! [`Thenable`](crate::Thenable): the adopting future subscribes to it and settles
//! with whatever it delivers (flattening) instead of storing it as a value.
//!
//! ## Contract
//! - Exactly one of the two callbacks is called, at most once.
//! - The call may happen synchronously inside `then_boxed` (already settled) or later.
//! - Implementors that wrap a [`Thenable`](crate::Thenable) should return it from
//!   [`Then::as_thenable`] so adoption cycles through them are detected.
//!
//! ## Example
//! ```rust
//! use thenable::{OnFulfilled, OnRejected, Then, Thenable};
//!
//! /// A foreign future that is always ready.
//! struct Ready(u32);
//!
//! impl Then<u32, String> for Ready {
//!     fn then_boxed(&self, on_fulfilled: OnFulfilled<u32>, _on_rejected: OnRejected<String>) {
//!         on_fulfilled(self.0);
//!     }
//! }
//!
//! let t: Thenable<u32, String> = Thenable::pending();
//! t.adopt(Ready(9)).unwrap();
//! assert_eq!(t.value(), Some(9));
//! ```

use std::fmt;

use crate::thenable::Thenable;

/// Callback receiving a fulfillment value.
pub type OnFulfilled<T> = Box<dyn FnOnce(T)>;

/// Callback receiving a rejection reason.
pub type OnRejected<E> = Box<dyn FnOnce(E)>;

/// Capability of delivering an eventual outcome to `(on_fulfilled, on_rejected)`.
pub trait Then<T, E> {
    /// Registers the callback pair.
    fn then_boxed(&self, on_fulfilled: OnFulfilled<T>, on_rejected: OnRejected<E>);

    /// The underlying [`Thenable`], if this value is (or wraps) one.
    fn as_thenable(&self) -> Option<&Thenable<T, E>> {
        None
    }
}

/// What a future is fulfilled with: a plain value, or something to adopt.
pub enum Resolution<T, E> {
    /// Stored as the fulfillment value.
    Value(T),
    /// Adopted: the future settles with this thenable's eventual outcome.
    Thenable(Box<dyn Then<T, E>>),
}

impl<T, E> Resolution<T, E> {
    /// Plain value, stored as is.
    #[inline]
    pub fn value(value: T) -> Self {
        Resolution::Value(value)
    }

    /// Wraps any [`Then`] implementor for adoption.
    #[inline]
    pub fn thenable<X>(inner: X) -> Self
    where
        X: Then<T, E> + 'static,
    {
        Resolution::Thenable(Box::new(inner))
    }

    /// True if resolving with this value defers settlement.
    #[inline]
    pub fn is_thenable(&self) -> bool {
        matches!(self, Resolution::Thenable(_))
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Resolution<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Resolution::Thenable(_) => f.write_str("Thenable(..)"),
        }
    }
}
