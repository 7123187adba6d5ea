//! # Settlement handle passed to executors.
//!
//! A [`Resolver`] is the `(fulfill, reject)` pair of a [`Thenable`] bundled into one
//! cloneable value. It can be kept after the executor returns, which is how a future
//! is settled from outside its constructor.

use crate::error::{Rejection, ThenableError};
use crate::thenable::state::PromiseState;
use crate::thenable::then::{Resolution, Then};
use crate::thenable::thenable::Thenable;

/// Settlement capability of one [`Thenable`].
///
/// # Example
/// ```
/// use std::cell::RefCell;
/// use thenable::{PromiseState, Resolver, Thenable};
///
/// let slot: RefCell<Option<Resolver<&str>>> = RefCell::new(None);
/// let t: Thenable<&str> = Thenable::new(|r| {
///     *slot.borrow_mut() = Some(r.clone());
///     Ok(())
/// });
/// assert_eq!(t.state(), PromiseState::Pending);
///
/// slot.borrow().as_ref().unwrap().fulfill("later");
/// assert_eq!(t.value(), Some("later"));
/// ```
pub struct Resolver<T, E = Rejection> {
    target: Thenable<T, E>,
}

impl<T, E> Clone for Resolver<T, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<T, E> Resolver<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    pub(crate) fn new(target: Thenable<T, E>) -> Self {
        Self { target }
    }

    /// See [`Thenable::fulfill`].
    #[inline]
    pub fn fulfill(&self, value: T) {
        self.target.fulfill(value);
    }

    /// See [`Thenable::reject`].
    #[inline]
    pub fn reject(&self, reason: E) {
        self.target.reject(reason);
    }

    /// See [`Thenable::resolve`].
    #[inline]
    pub fn resolve(&self, resolution: Resolution<T, E>) -> Result<(), ThenableError> {
        self.target.resolve(resolution)
    }

    /// See [`Thenable::adopt`].
    #[inline]
    pub fn adopt<X>(&self, inner: X) -> Result<(), ThenableError>
    where
        X: Then<T, E> + 'static,
    {
        self.target.adopt(inner)
    }

    /// State of the target future.
    #[inline]
    pub fn state(&self) -> PromiseState {
        self.target.state()
    }

    /// The future this resolver settles.
    pub fn thenable(&self) -> Thenable<T, E> {
        self.target.clone()
    }
}
