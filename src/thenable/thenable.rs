//! # Thenable: a future settled from the outside.
//!
//! [`Thenable`] holds one eventual value (or rejection reason) and delivers it to
//! continuations **synchronously**, on the call stack of whoever settles it.
//!
//! ## Architecture
//! ```text
//!   Resolver::fulfill(v) ──┐
//!   Thenable::reject(r)  ──┼──► settle(outcome) ──► continuations (policy: Single | FanOut)
//!   adopted inner settles ─┘          │                    │
//!                                     │                    └─► derived Thenable::settle(handler(outcome))
//!                                     └─► wakers of `.await`ers
//! ```
//!
//! ## Rules
//! - Settlement is one-way: the first `fulfill`/`reject` wins, later ones are ignored.
//! - A continuation registered before settlement fires exactly once, at settlement.
//! - A continuation registered after settlement fires immediately, inside `then`.
//! - Under [`ContinuationPolicy::Single`](crate::ContinuationPolicy::Single) a new
//!   registration replaces the previous one on the same future.
//! - A handler fails by returning `Err(reason)`; the derived future is rejected with it.
//! - No borrow of the shared state is held while user code runs, so callbacks may
//!   freely settle or chain on any future, including this one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;
use std::rc::{Rc, Weak};
use std::task::Waker;

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::{Rejection, ThenableError};
use crate::thenable::resolver::Resolver;
use crate::thenable::state::PromiseState;
use crate::thenable::then::{OnFulfilled, OnRejected, Resolution, Then};

type Shared<T, E> = Rc<RefCell<Inner<T, E>>>;

/// A registered `{on_fulfilled, on_rejected}` pair.
struct Continuation<T, E> {
    on_fulfilled: OnFulfilled<T>,
    on_rejected: OnRejected<E>,
}

impl<T, E> Continuation<T, E> {
    fn fire(self, outcome: Result<T, E>) {
        match outcome {
            Ok(value) => (self.on_fulfilled)(value),
            Err(reason) => (self.on_rejected)(reason),
        }
    }
}

struct Inner<T, E> {
    /// `None` while pending.
    outcome: Option<Result<T, E>>,
    continuations: Vec<Continuation<T, E>>,
    wakers: Vec<Waker>,
    /// Crate-internal observers run before continuations; never replaced.
    settle_hooks: Vec<Box<dyn FnOnce()>>,
    /// Thenable currently being adopted.
    following: Option<Weak<RefCell<Inner<T, E>>>>,
    config: Config,
}

impl<T, E> Inner<T, E> {
    fn state(&self) -> PromiseState {
        match &self.outcome {
            None => PromiseState::Pending,
            Some(Ok(_)) => PromiseState::Fulfilled,
            Some(Err(_)) => PromiseState::Rejected,
        }
    }
}

/// Single-threaded future with external settlement, synchronous state and chaining.
///
/// `Thenable` is a cheap handle: clones share the same state.
///
/// # Example
/// ```
/// use thenable::{PromiseState, Thenable};
///
/// let t: Thenable<i32, String> = Thenable::new(|r| {
///     r.fulfill(12);
///     Ok(())
/// });
/// assert_eq!(t.state(), PromiseState::Fulfilled);
///
/// let next = t.then(|v| Ok(v + 1));
/// assert_eq!(next.value(), Some(13));
///
/// let failed: Thenable<i32, String> = Thenable::new(|_| Err("x".to_string()));
/// let passed = failed.then(|v| Ok(v * 2));
/// assert_eq!(passed.reason().as_deref(), Some("x"));
/// ```
pub struct Thenable<T, E = Rejection> {
    inner: Shared<T, E>,
}

impl<T, E> Clone for Thenable<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, E> Thenable<T, E> {
    /// Current state, without suspending.
    pub fn state(&self) -> PromiseState {
        self.inner.borrow().state()
    }

    /// Config this future was created with.
    pub fn config(&self) -> Config {
        self.inner.borrow().config
    }

    /// True if both handles point at the same future.
    #[inline]
    pub fn ptr_eq(&self, other: &Thenable<T, E>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of continuations waiting for settlement.
    pub fn pending_continuations(&self) -> usize {
        self.inner.borrow().continuations.len()
    }
}

impl<T, E> Thenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Creates a future and runs `executor` synchronously with its [`Resolver`].
    ///
    /// If the executor returns `Err(reason)` the future is rejected with `reason`
    /// (ignored if the executor already settled it).
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(&Resolver<T, E>) -> Result<(), E>,
    {
        Self::with_config(Config::default(), executor)
    }

    /// Same as [`Thenable::new`] with an explicit [`Config`].
    pub fn with_config<F>(config: Config, executor: F) -> Self
    where
        F: FnOnce(&Resolver<T, E>) -> Result<(), E>,
    {
        let thenable = Self::pending_with(config);
        let resolver = thenable.resolver();
        if let Err(reason) = executor(&resolver) {
            trace!(state = %thenable.state(), "executor failed");
            thenable.reject(reason);
        }
        thenable
    }

    /// A pending future to be settled later through [`fulfill`](Self::fulfill) /
    /// [`reject`](Self::reject) or a [`Resolver`].
    pub fn pending() -> Self {
        Self::pending_with(Config::default())
    }

    /// A pending future with an explicit [`Config`].
    pub fn pending_with(config: Config) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                outcome: None,
                continuations: Vec::new(),
                wakers: Vec::new(),
                settle_hooks: Vec::new(),
                following: None,
                config,
            })),
        }
    }

    /// An already fulfilled future.
    pub fn fulfilled(value: T) -> Self {
        let t = Self::pending();
        t.fulfill(value);
        t
    }

    /// An already rejected future.
    pub fn rejected(reason: E) -> Self {
        let t = Self::pending();
        t.reject(reason);
        t
    }

    /// Settlement capability for this future.
    pub fn resolver(&self) -> Resolver<T, E> {
        Resolver::new(self.clone())
    }

    /// Fulfillment value, if fulfilled.
    pub fn value(&self) -> Option<T> {
        match &self.inner.borrow().outcome {
            Some(Ok(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Rejection reason, if rejected.
    pub fn reason(&self) -> Option<E> {
        match &self.inner.borrow().outcome {
            Some(Err(reason)) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Settled outcome, `None` while pending.
    pub fn outcome(&self) -> Option<Result<T, E>> {
        self.inner.borrow().outcome.clone()
    }

    /// Fulfills with a plain value. No-op unless pending.
    pub fn fulfill(&self, value: T) {
        self.settle(Ok(value));
    }

    /// Rejects with `reason`. No-op unless pending. Reasons are never adopted.
    pub fn reject(&self, reason: E) {
        self.settle(Err(reason));
    }

    /// Fulfills with a [`Resolution`]: values are stored, thenables are adopted.
    pub fn resolve(&self, resolution: Resolution<T, E>) -> Result<(), ThenableError> {
        match resolution {
            Resolution::Value(value) => {
                self.fulfill(value);
                Ok(())
            }
            Resolution::Thenable(inner) => self.adopt_boxed(inner),
        }
    }

    /// Settles with the eventual outcome of `inner` (flattening).
    ///
    /// Fails, leaving this future untouched, if `inner` is this future or a
    /// [`Thenable`] whose chain of pending adoptions leads back here, or if that
    /// chain is longer than [`Config::max_adoption_depth`].
    pub fn adopt<X>(&self, inner: X) -> Result<(), ThenableError>
    where
        X: Then<T, E> + 'static,
    {
        self.adopt_boxed(Box::new(inner))
    }

    /// Like [`adopt`](Self::adopt), but turns an adoption failure into a rejection.
    pub fn adopt_or_reject<X>(&self, inner: X)
    where
        X: Then<T, E> + 'static,
        E: From<ThenableError>,
    {
        if let Err(err) = self.adopt(inner) {
            warn!(
                label = err.as_label(),
                error = %err.as_message(),
                "adoption refused; rejecting"
            );
            self.reject(E::from(err));
        }
    }

    fn adopt_boxed(&self, inner: Box<dyn Then<T, E>>) -> Result<(), ThenableError> {
        if self.state().is_settled() {
            debug!(state = %self.state(), "ignoring adoption by a settled thenable");
            return Ok(());
        }
        if let Some(target) = inner.as_thenable() {
            self.check_adoption(target)?;
            self.inner.borrow_mut().following = Some(Rc::downgrade(&target.inner));
        }
        trace!("adopting thenable");
        let on_value = self.clone();
        let on_reason = self.clone();
        inner.then_boxed(
            Box::new(move |value| on_value.fulfill(value)),
            Box::new(move |reason| on_reason.reject(reason)),
        );
        Ok(())
    }

    /// Walks the pending-adoption chain starting at `target`.
    fn check_adoption(&self, target: &Thenable<T, E>) -> Result<(), ThenableError> {
        let limit = self.config().adoption_limit();
        let mut node = Rc::clone(&target.inner);
        let mut links = 0_usize;
        loop {
            if Rc::ptr_eq(&node, &self.inner) {
                return Err(ThenableError::SelfResolution);
            }
            let next = node.borrow().following.as_ref().and_then(Weak::upgrade);
            let Some(next) = next else {
                return Ok(());
            };
            links += 1;
            if let Some(limit) = limit.filter(|&limit| links > limit) {
                return Err(ThenableError::AdoptionTooDeep { limit });
            }
            node = next;
        }
    }

    fn settle(&self, outcome: Result<T, E>) {
        let (hooks, continuations, wakers) = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                debug!(state = %inner.state(), "ignoring settlement of a settled thenable");
                return;
            }
            inner.outcome = Some(outcome.clone());
            inner.following = None;
            (
                mem::take(&mut inner.settle_hooks),
                mem::take(&mut inner.continuations),
                mem::take(&mut inner.wakers),
            )
        };
        for hook in hooks {
            hook();
        }
        trace!(
            fulfilled = outcome.is_ok(),
            continuations = continuations.len(),
            wakers = wakers.len(),
            "thenable settled"
        );
        for continuation in continuations {
            continuation.fire(outcome.clone());
        }
        for waker in wakers {
            waker.wake();
        }
    }

    fn register(&self, continuation: Continuation<T, E>) {
        let settled = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_none() {
                if inner.config.continuations.replaces() && !inner.continuations.is_empty() {
                    debug!("replacing pending continuation");
                    inner.continuations.clear();
                }
                inner.continuations.push(continuation);
                return;
            }
            inner.outcome.clone()
        };
        if let Some(outcome) = settled {
            continuation.fire(outcome);
        }
    }

    /// Runs `hook` once when this future settles, by any path; immediately if it already has.
    ///
    /// Hooks are independent of the continuation policy and run before continuations.
    pub(crate) fn on_settle<H>(&self, hook: H)
    where
        H: FnOnce() + 'static,
    {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_none() {
                inner.settle_hooks.push(Box::new(hook));
                return;
            }
        }
        hook();
    }

    /// Registers `waker` unless settled; returns the outcome if settled.
    pub(crate) fn poll_outcome(&self, waker: &Waker) -> Option<Result<T, E>> {
        let mut inner = self.inner.borrow_mut();
        if let Some(outcome) = &inner.outcome {
            return Some(outcome.clone());
        }
        if let Some(existing) = inner.wakers.iter_mut().find(|w| w.will_wake(waker)) {
            existing.clone_from(waker);
        } else {
            inner.wakers.push(waker.clone());
        }
        None
    }

    /// Chains a fulfillment handler; a rejection passes through unchanged.
    pub fn then<U, F>(&self, on_fulfilled: F) -> Thenable<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Result<U, E> + 'static,
    {
        self.then_with(on_fulfilled, |reason| Err(reason))
    }

    /// Chains both handlers. Each returns the outcome of the derived future.
    pub fn then_with<U, F, R>(&self, on_fulfilled: F, on_rejected: R) -> Thenable<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Result<U, E> + 'static,
        R: FnOnce(E) -> Result<U, E> + 'static,
    {
        let next = Thenable::pending_with(self.config());
        let on_value = next.clone();
        let on_reason = next.clone();
        self.register(Continuation {
            on_fulfilled: Box::new(move |value| on_value.settle(on_fulfilled(value))),
            on_rejected: Box::new(move |reason| on_reason.settle(on_rejected(reason))),
        });
        next
    }

    /// Chains a handler returning a future; the derived future adopts it.
    ///
    /// If the returned future cannot be adopted (see [`adopt`](Self::adopt)) the
    /// derived future is rejected with the [`ThenableError`].
    pub fn and_then<U, F>(&self, on_fulfilled: F) -> Thenable<U, E>
    where
        U: Clone + 'static,
        F: FnOnce(T) -> Thenable<U, E> + 'static,
        E: From<ThenableError>,
    {
        let next = Thenable::pending_with(self.config());
        let on_value = next.clone();
        let on_reason = next.clone();
        self.register(Continuation {
            on_fulfilled: Box::new(move |value| on_value.adopt_or_reject(on_fulfilled(value))),
            on_rejected: Box::new(move |reason| on_reason.reject(reason)),
        });
        next
    }

    /// Chains a rejection handler; a fulfillment passes through unchanged.
    pub fn catch<R>(&self, on_rejected: R) -> Thenable<T, E>
    where
        R: FnOnce(E) -> Result<T, E> + 'static,
    {
        self.then_with(|value| Ok(value), on_rejected)
    }

    /// Runs `on_finally` once on settlement, whatever the outcome.
    ///
    /// The derived future is **fulfilled** on both paths: with `Ok(value)` when this
    /// future was fulfilled and with `Err(reason)` when it was rejected. The reason
    /// is not re-thrown. It is rejected only if `on_finally` itself fails.
    ///
    /// ```
    /// use thenable::{PromiseState, Thenable};
    ///
    /// let failed: Thenable<u8, &str> = Thenable::rejected("gone");
    /// let after = failed.finally(|| Ok(()));
    /// assert_eq!(after.state(), PromiseState::Fulfilled);
    /// assert_eq!(after.value(), Some(Err("gone")));
    /// ```
    pub fn finally<F>(&self, on_finally: F) -> Thenable<Result<T, E>, E>
    where
        F: FnOnce() -> Result<(), E> + 'static,
    {
        let slot = Rc::new(Cell::new(Some(on_finally)));
        let other = Rc::clone(&slot);
        self.then_with(
            move |value| run_once(&slot).map(|()| Ok(value)),
            move |reason| run_once(&other).map(|()| Err(reason)),
        )
    }
}

fn run_once<F, E>(slot: &Cell<Option<F>>) -> Result<(), E>
where
    F: FnOnce() -> Result<(), E>,
{
    slot.take().map_or(Ok(()), |f| f())
}

impl<T, E> Then<T, E> for Thenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn then_boxed(&self, on_fulfilled: OnFulfilled<T>, on_rejected: OnRejected<E>) {
        self.register(Continuation {
            on_fulfilled,
            on_rejected,
        });
    }

    fn as_thenable(&self) -> Option<&Thenable<T, E>> {
        Some(self)
    }
}

impl<T, E> Default for Thenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn default() -> Self {
        Self::pending()
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Thenable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Thenable")
            .field("state", &inner.state())
            .field("outcome", &inner.outcome)
            .field("continuations", &inner.continuations.len())
            .finish()
    }
}
