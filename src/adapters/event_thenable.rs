//! # EventThenable: a `Thenable` bound to one event.
//!
//! [`EventThenable`] subscribes to an [`EventSignal`] when it is created and
//! fulfills with the first event it receives (`Some(event)`), or with `None` when
//! [`cancel`](EventThenable::cancel) is called first. Either way the subscription
//! is removed exactly once.
//!
//! Chaining goes through the wrapped [`Thenable`], so everything that works on a
//! `Thenable` (synchronous `state()`, `then`, `finally`, adoption, `.await`) works here.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use thenable::{EventThenable, LocalSignal, PromiseState};
//!
//! let clicks: Rc<LocalSignal<(i32, i32)>> = Rc::new(LocalSignal::new());
//! let first = EventThenable::<(i32, i32)>::new(&clicks);
//! let x = first.then(|click| Ok(click.map(|(x, _)| x)));
//!
//! clicks.dispatch((3, 4));
//! clicks.dispatch((5, 6));
//! assert_eq!(x.value(), Some(Some(3)));
//!
//! let never = EventThenable::<(i32, i32)>::new(&clicks);
//! assert!(never.cancel());
//! assert_eq!(never.state(), PromiseState::Fulfilled);
//! assert_eq!(never.value(), Some(None));
//! ```

use std::future::IntoFuture;
use std::rc::Rc;

use crate::adapters::binding::OneShot;
use crate::config::Config;
use crate::error::{Rejection, ThenableError};
use crate::events::EventSignal;
use crate::thenable::{OnFulfilled, OnRejected, PromiseState, Then, Thenable, ThenableFuture};

/// A [`Thenable`] settled by the first event of a signal, or by cancellation.
pub struct EventThenable<T, E = Rejection> {
    thenable: Thenable<Option<T>, E>,
    binding: Rc<OneShot<T>>,
}

impl<T, E> Clone for EventThenable<T, E> {
    fn clone(&self) -> Self {
        Self {
            thenable: self.thenable.clone(),
            binding: Rc::clone(&self.binding),
        }
    }
}

impl<T, E> EventThenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Subscribes to `signal` without a filter.
    pub fn new<S>(signal: &Rc<S>) -> Self
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
    {
        Self::with_config(signal, None, Config::default())
    }

    /// Subscribes to `signal` with `filter`, forwarded verbatim.
    pub fn with_filter<S>(signal: &Rc<S>, filter: S::Filter) -> Self
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
    {
        Self::with_config(signal, Some(filter), Config::default())
    }

    /// Full constructor: optional filter and the [`Config`] of the wrapped future.
    pub fn with_config<S>(signal: &Rc<S>, filter: Option<S::Filter>, config: Config) -> Self
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
    {
        let thenable = Thenable::pending_with(config);
        let target = thenable.clone();
        let binding = OneShot::bind(signal, filter, move |event| target.fulfill(event));
        let weak = Rc::downgrade(&binding);
        thenable.on_settle(move || {
            if let Some(binding) = weak.upgrade() {
                binding.detach();
            }
        });
        Self { thenable, binding }
    }

    /// Fulfills with `None` and unsubscribes, unless already settled.
    ///
    /// Returns `true` if this call settled the adapter.
    pub fn cancel(&self) -> bool {
        self.binding.cancel()
    }

    /// True once an event arrived or `cancel` ran.
    pub fn is_settled(&self) -> bool {
        self.binding.is_settled()
    }

    pub fn state(&self) -> PromiseState {
        self.thenable.state()
    }

    /// `Some(Some(event))` after an event, `Some(None)` after cancel, `None` while pending.
    pub fn value(&self) -> Option<Option<T>> {
        self.thenable.value()
    }

    /// The wrapped future.
    ///
    /// Settling it directly (or through its [`Resolver`](crate::Resolver)) also
    /// releases the subscription, exactly as an event or `cancel()` would.
    pub fn as_thenable(&self) -> &Thenable<Option<T>, E> {
        &self.thenable
    }

    /// See [`Thenable::then`].
    pub fn then<U, F>(&self, on_fulfilled: F) -> Thenable<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(Option<T>) -> Result<U, E> + 'static,
    {
        self.thenable.then(on_fulfilled)
    }

    /// See [`Thenable::then_with`].
    pub fn then_with<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Thenable<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(Option<T>) -> Result<U, E> + 'static,
        R: FnOnce(E) -> Result<U, E> + 'static,
    {
        self.thenable.then_with(on_fulfilled, on_rejected)
    }

    /// See [`Thenable::and_then`].
    pub fn and_then<U, F>(&self, on_fulfilled: F) -> Thenable<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(Option<T>) -> Thenable<U, E> + 'static,
        E: From<ThenableError>,
    {
        self.thenable.and_then(on_fulfilled)
    }

    /// See [`Thenable::catch`].
    pub fn catch<R>(&self, on_rejected: R) -> Thenable<Option<T>, E>
    where
        R: FnOnce(E) -> Result<Option<T>, E> + 'static,
    {
        self.thenable.catch(on_rejected)
    }

    /// See [`Thenable::finally`].
    pub fn finally<F>(&self, on_finally: F) -> Thenable<Result<Option<T>, E>, E>
    where
        F: FnOnce() -> Result<(), E> + 'static,
    {
        self.thenable.finally(on_finally)
    }
}

impl<T, E> Then<Option<T>, E> for EventThenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn then_boxed(&self, on_fulfilled: OnFulfilled<Option<T>>, on_rejected: OnRejected<E>) {
        self.thenable.then_boxed(on_fulfilled, on_rejected);
    }

    fn as_thenable(&self) -> Option<&Thenable<Option<T>, E>> {
        Some(&self.thenable)
    }
}

impl<T, E> IntoFuture for EventThenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<Option<T>, E>;
    type IntoFuture = ThenableFuture<Option<T>, E>;

    fn into_future(self) -> Self::IntoFuture {
        self.thenable.into_future()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::events::LocalSignal;

    fn signal() -> Rc<LocalSignal<u32, u32>> {
        Rc::new(LocalSignal::with_predicate(|wanted, ev| wanted == ev))
    }

    #[test]
    fn test_first_event_settles_and_unsubscribes() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        assert_eq!(adapter.state(), PromiseState::Pending);
        assert_eq!(signal.len(), 1);

        signal.dispatch(4);
        assert_eq!(adapter.state(), PromiseState::Fulfilled);
        assert_eq!(adapter.value(), Some(Some(4)));
        assert!(signal.is_empty());

        signal.dispatch(5);
        assert_eq!(adapter.value(), Some(Some(4)));
    }

    #[test]
    fn test_cancel_before_event() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        assert!(adapter.cancel());
        assert!(adapter.is_settled());
        assert_eq!(adapter.value(), Some(None));
        assert!(signal.is_empty());

        assert!(!adapter.cancel());
        signal.dispatch(1);
        assert_eq!(adapter.value(), Some(None));
    }

    #[test]
    fn test_cancel_after_event_is_noop() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        signal.dispatch(2);
        assert!(!adapter.cancel());
        assert_eq!(adapter.value(), Some(Some(2)));
    }

    #[test]
    fn test_filter_selects_event() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::with_filter(&signal, 7);
        signal.dispatch(6);
        assert_eq!(adapter.state(), PromiseState::Pending);
        signal.dispatch(7);
        assert_eq!(adapter.value(), Some(Some(7)));
    }

    #[test]
    fn test_continuation_runs_inside_dispatch() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let doubled = adapter.then(move |ev| {
            let v = ev.unwrap_or_default() * 2;
            sink.set(v);
            Ok(v)
        });

        signal.dispatch(21);
        assert_eq!(seen.get(), 42);
        assert_eq!(doubled.value(), Some(42));
    }

    #[test]
    fn test_finally_on_cancel() {
        let signal = signal();
        let adapter: EventThenable<u32, &str> = EventThenable::new(&signal);
        let ran = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ran);
        let after = adapter.finally(move || {
            flag.set(true);
            Ok(())
        });
        adapter.cancel();
        assert!(ran.get());
        assert_eq!(after.value(), Some(Ok(None)));
    }

    #[test]
    fn test_thenable_adopts_event_thenable() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        let outer: Thenable<Option<u32>> = Thenable::pending();
        outer.adopt(adapter.clone()).unwrap();

        assert_eq!(outer.adopt(outer.clone()), Err(crate::ThenableError::SelfResolution));
        signal.dispatch(9);
        assert_eq!(outer.value(), Some(Some(9)));
    }

    #[test]
    fn test_external_settlement_releases_subscription() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        adapter.as_thenable().reject(Rejection::new("external"));

        assert_eq!(adapter.state(), PromiseState::Rejected);
        assert!(adapter.is_settled());
        assert!(signal.is_empty());
        assert!(!adapter.cancel());

        signal.dispatch(1);
        assert_eq!(adapter.state(), PromiseState::Rejected);
    }

    #[test]
    fn test_resolver_settlement_releases_subscription() {
        let signal = signal();
        let adapter: EventThenable<u32> = EventThenable::new(&signal);
        adapter.as_thenable().resolver().fulfill(Some(40));

        assert!(adapter.is_settled());
        assert!(signal.is_empty());
        signal.dispatch(41);
        assert_eq!(adapter.value(), Some(Some(40)));
    }

    #[test]
    fn test_dropping_adapter_keeps_subscription_alive() {
        let signal = signal();
        let seen = Rc::new(Cell::new(None));
        {
            let adapter: EventThenable<u32> = EventThenable::new(&signal);
            let sink = Rc::clone(&seen);
            let _ = adapter.then(move |ev| {
                sink.set(ev);
                Ok(())
            });
        }
        assert_eq!(signal.len(), 1);
        signal.dispatch(3);
        assert_eq!(seen.get(), Some(3));
        assert!(signal.is_empty());
    }
}
