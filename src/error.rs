//! Error types used by futures and their adapters.
//!
//! This module defines:
//!
//! - [`ThenableError`]: failures of the primitive itself (adoption cycles, bad state strings).
//! - [`Rejection`]: the default rejection reason carried by a rejected future.
//!
//! Rejections are values, not errors of the library: a [`Thenable`](crate::Thenable)
//! never panics or returns `Err` because a user callback failed. The only fallible
//! operations are the ones that would corrupt the state machine if allowed.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// # Errors produced by the future primitive.
///
/// These are returned synchronously from the operation that caused them and
/// leave the future untouched.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThenableError {
    /// A future was asked to adopt itself, directly or through a chain of pending adoptions.
    #[error("a thenable cannot adopt itself")]
    SelfResolution,

    /// The chain of pending adoptions is longer than the configured bound.
    #[error("adoption chain exceeds {limit} links")]
    AdoptionTooDeep {
        /// The configured bound ([`Config::max_adoption_depth`](crate::Config::max_adoption_depth)).
        limit: usize,
    },

    /// A string did not name a known [`PromiseState`](crate::PromiseState).
    #[error("unknown promise state {value:?}")]
    UnknownState {
        /// The rejected input.
        value: String,
    },
}

impl ThenableError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use thenable::ThenableError;
    ///
    /// let err = ThenableError::AdoptionTooDeep { limit: 8 };
    /// assert_eq!(err.as_label(), "adoption_too_deep");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ThenableError::SelfResolution => "self_resolution",
            ThenableError::AdoptionTooDeep { .. } => "adoption_too_deep",
            ThenableError::UnknownState { .. } => "unknown_state",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ThenableError::SelfResolution => "adoption cycle detected".to_string(),
            ThenableError::AdoptionTooDeep { limit } => {
                format!("adoption chain longer than {limit}")
            }
            ThenableError::UnknownState { value } => format!("unknown state: {value}"),
        }
    }
}

/// # Type-erased rejection reason.
///
/// Rejection reasons are unconstrained: any `'static` value can be used. `Rejection`
/// is the default `E` of [`Thenable`](crate::Thenable) and keeps the original value
/// recoverable through [`Rejection::downcast_ref`].
///
/// Cloning is cheap (shared `Rc`).
///
/// # Example
/// ```
/// use thenable::Rejection;
///
/// let r = Rejection::new("boom");
/// assert_eq!(r.downcast_ref::<&str>(), Some(&"boom"));
/// assert!(r.downcast_ref::<String>().is_none());
/// ```
#[derive(Clone)]
pub struct Rejection(Rc<dyn Any>);

impl Rejection {
    /// Wraps any value as a rejection reason.
    pub fn new<R: Any>(reason: R) -> Self {
        Self(Rc::new(reason))
    }

    /// Returns the reason if it has type `R`.
    #[inline]
    pub fn downcast_ref<R: Any>(&self) -> Option<&R> {
        self.0.downcast_ref::<R>()
    }

    /// True if the reason has type `R`.
    #[inline]
    pub fn is<R: Any>(&self) -> bool {
        self.0.is::<R>()
    }

    /// True if both handles share the same reason allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Rejection) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.downcast_ref::<&str>() {
            f.debug_tuple("Rejection").field(s).finish()
        } else if let Some(s) = self.downcast_ref::<String>() {
            f.debug_tuple("Rejection").field(s).finish()
        } else if let Some(e) = self.downcast_ref::<ThenableError>() {
            f.debug_tuple("Rejection").field(e).finish()
        } else {
            f.write_str("Rejection(..)")
        }
    }
}

impl From<ThenableError> for Rejection {
    fn from(err: ThenableError) -> Self {
        Rejection::new(err)
    }
}
