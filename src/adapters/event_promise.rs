//! # EventPromise: a native `Future` bound to one event.
//!
//! [`EventPromise`] has the same contract as
//! [`EventThenable`](crate::EventThenable) (same binding, same settlement rules)
//! but is built directly on Rust's `Future` trait instead of on
//! [`Thenable`](crate::Thenable): consumers `.await` it.
//!
//! ## Rules
//! - Output is `Some(event)` for the first event, `None` after `cancel()`.
//! - It never rejects.
//! - Clones share one outcome; every clone can be awaited.
//! - As a [`Then`] implementor it keeps every registered callback (fan-out), so a
//!   `Thenable` can adopt it alongside other observers.
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use thenable::{EventPromise, LocalSignal};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let ready: Rc<LocalSignal<&str>> = Rc::new(LocalSignal::new());
//! let promise = EventPromise::new(&ready);
//!
//! let dispatch = async {
//!     tokio::task::yield_now().await;
//!     ready.dispatch("go");
//! };
//! let (event, ()) = tokio::join!(promise, dispatch);
//! assert_eq!(event, Some("go"));
//! # }
//! ```

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use futures::future::FusedFuture;
use tracing::trace;

use crate::adapters::binding::OneShot;
use crate::events::EventSignal;
use crate::thenable::{OnFulfilled, OnRejected, PromiseState, Then};

struct PromiseCell<T> {
    /// `None` while pending.
    outcome: Option<Option<T>>,
    wakers: Vec<Waker>,
    reactions: Vec<OnFulfilled<Option<T>>>,
}

impl<T: Clone> PromiseCell<T> {
    fn complete(cell: &RefCell<Self>, value: Option<T>) {
        let (wakers, reactions) = {
            let mut cell = cell.borrow_mut();
            if cell.outcome.is_some() {
                return;
            }
            cell.outcome = Some(value.clone());
            (mem::take(&mut cell.wakers), mem::take(&mut cell.reactions))
        };
        trace!(
            cancelled = value.is_none(),
            wakers = wakers.len(),
            reactions = reactions.len(),
            "event promise settled"
        );
        for reaction in reactions {
            reaction(value.clone());
        }
        for waker in wakers {
            waker.wake();
        }
    }
}

/// Awaitable settled by the first event of a signal, or by cancellation.
#[must_use = "futures do nothing unless polled"]
pub struct EventPromise<T> {
    cell: Rc<RefCell<PromiseCell<T>>>,
    binding: Rc<OneShot<T>>,
    terminated: bool,
}

impl<T> Clone for EventPromise<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            binding: Rc::clone(&self.binding),
            terminated: false,
        }
    }
}

impl<T> EventPromise<T>
where
    T: Clone + 'static,
{
    /// Subscribes to `signal` without a filter.
    pub fn new<S>(signal: &Rc<S>) -> Self
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
    {
        Self::bind(signal, None)
    }

    /// Subscribes to `signal` with `filter`, forwarded verbatim.
    pub fn with_filter<S>(signal: &Rc<S>, filter: S::Filter) -> Self
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
    {
        Self::bind(signal, Some(filter))
    }

    fn bind<S>(signal: &Rc<S>, filter: Option<S::Filter>) -> Self
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
    {
        let cell = Rc::new(RefCell::new(PromiseCell {
            outcome: None,
            wakers: Vec::new(),
            reactions: Vec::new(),
        }));
        let target = Rc::clone(&cell);
        let binding = OneShot::bind(signal, filter, move |event| {
            PromiseCell::complete(&target, event);
        });
        Self {
            cell,
            binding,
            terminated: false,
        }
    }

    /// Fulfills with `None` and unsubscribes, unless already settled.
    ///
    /// Returns `true` if this call settled the promise.
    pub fn cancel(&self) -> bool {
        self.binding.cancel()
    }

    /// True once an event arrived or `cancel` ran.
    pub fn is_settled(&self) -> bool {
        self.binding.is_settled()
    }

    /// `Pending` or `Fulfilled`; an event promise never rejects.
    pub fn state(&self) -> PromiseState {
        if self.cell.borrow().outcome.is_some() {
            PromiseState::Fulfilled
        } else {
            PromiseState::Pending
        }
    }

    /// `Some(Some(event))` after an event, `Some(None)` after cancel, `None` while pending.
    pub fn value(&self) -> Option<Option<T>> {
        self.cell.borrow().outcome.clone()
    }
}

impl<T> Future for EventPromise<T>
where
    T: Clone + 'static,
{
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = {
            let mut cell = self.cell.borrow_mut();
            if cell.outcome.is_none() {
                let waker = cx.waker();
                if let Some(existing) = cell.wakers.iter_mut().find(|w| w.will_wake(waker)) {
                    existing.clone_from(waker);
                } else {
                    cell.wakers.push(waker.clone());
                }
            }
            cell.outcome.clone()
        };
        match ready {
            Some(value) => {
                self.terminated = true;
                Poll::Ready(value)
            }
            None => Poll::Pending,
        }
    }
}

impl<T> FusedFuture for EventPromise<T>
where
    T: Clone + 'static,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<T, E> Then<Option<T>, E> for EventPromise<T>
where
    T: Clone + 'static,
{
    fn then_boxed(&self, on_fulfilled: OnFulfilled<Option<T>>, _on_rejected: OnRejected<E>) {
        let settled = {
            let mut cell = self.cell.borrow_mut();
            if cell.outcome.is_none() {
                cell.reactions.push(on_fulfilled);
                return;
            }
            cell.outcome.clone()
        };
        if let Some(value) = settled {
            on_fulfilled(value);
        }
    }
}

impl<T> fmt::Debug for EventPromise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.cell.borrow();
        f.debug_struct("EventPromise")
            .field("settled", &cell.outcome.is_some())
            .field("reactions", &cell.reactions.len())
            .finish()
    }
}
