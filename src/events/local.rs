//! # In-process event signal.
//!
//! [`LocalSignal`] is a single-threaded [`EventSignal`] for hosts that do not bring
//! their own event registry, and for tests.
//!
//! ## Architecture
//! ```text
//! Listeners (many):                      Dispatcher (host code):
//!   EventThenable ──┐
//!   EventPromise  ──┼──► LocalSignal ◄──── dispatch(event)
//!   closure       ──┘   (ordered list)
//! ```
//!
//! ## Rules
//! - **Synchronous**: `dispatch()` calls every matching listener before returning.
//! - **Registration order**: listeners run in the order they subscribed.
//! - **Re-entrant**: listeners may subscribe/unsubscribe during dispatch; a listener
//!   removed by an earlier one in the same dispatch is skipped.
//! - **Filters**: with a predicate (see [`LocalSignal::with_predicate`]) a filtered
//!   listener only receives events the predicate accepts; without one, filters are
//!   recorded and ignored.
//! - **No persistence**: events dispatched with no listener are dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::events::signal::{EventSignal, Listener, SubscriptionId};

type Predicate<T, F> = Box<dyn Fn(&F, &T) -> bool>;

struct Entry<T, F> {
    id: SubscriptionId,
    listener: Listener<T>,
    filter: Option<Rc<F>>,
}

/// Synchronous in-process signal.
///
/// # Example
/// ```rust
/// use std::rc::Rc;
/// use thenable::{EventThenable, LocalSignal, PromiseState};
///
/// let signal: Rc<LocalSignal<&str>> = Rc::new(LocalSignal::new());
/// let next = EventThenable::<&str>::new(&signal);
/// assert_eq!(signal.len(), 1);
///
/// assert_eq!(signal.dispatch("ready"), 1);
/// assert_eq!(next.state(), PromiseState::Fulfilled);
/// assert_eq!(next.value(), Some(Some("ready")));
/// assert!(signal.is_empty());
/// ```
pub struct LocalSignal<T, F = ()> {
    entries: RefCell<Vec<Entry<T, F>>>,
    predicate: Option<Predicate<T, F>>,
}

impl<T, F> LocalSignal<T, F>
where
    T: Clone + 'static,
    F: 'static,
{
    /// Creates a signal that ignores filters.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            predicate: None,
        }
    }

    /// Creates a signal whose filtered listeners only receive events accepted by `predicate`.
    pub fn with_predicate<P>(predicate: P) -> Self
    where
        P: Fn(&F, &T) -> bool + 'static,
    {
        Self {
            entries: RefCell::new(Vec::new()),
            predicate: Some(Box::new(predicate)),
        }
    }

    /// Delivers `event` to every matching listener; returns how many were called.
    pub fn dispatch(&self, event: T) -> usize {
        let snapshot: Vec<(SubscriptionId, Listener<T>, Option<Rc<F>>)> = self
            .entries
            .borrow()
            .iter()
            .map(|e| (e.id, Rc::clone(&e.listener), e.filter.clone()))
            .collect();

        let mut delivered = 0;
        for (id, listener, filter) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            let accepted = match (filter.as_deref(), self.predicate.as_ref()) {
                (Some(filter), Some(predicate)) => predicate(filter, &event),
                _ => true,
            };
            if !accepted {
                continue;
            }
            listener(event.clone());
            delivered += 1;
        }
        trace!(delivered, remaining = self.len(), "signal dispatched");
        delivered
    }

    /// True while `id` is registered.
    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn insert(&self, listener: Listener<T>, filter: Option<Rc<F>>) -> SubscriptionId {
        let id = SubscriptionId::next();
        trace!(%id, filtered = filter.is_some(), "listener subscribed");
        self.entries.borrow_mut().push(Entry {
            id,
            listener,
            filter,
        });
        id
    }
}

impl<T, F> EventSignal for LocalSignal<T, F>
where
    T: Clone + 'static,
    F: 'static,
{
    type Event = T;
    type Filter = F;

    fn subscribe(&self, listener: Listener<T>) -> SubscriptionId {
        self.insert(listener, None)
    }

    fn subscribe_filtered(&self, listener: Listener<T>, filter: F) -> SubscriptionId {
        self.insert(listener, Some(Rc::new(filter)))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|e| e.id == id) {
            Some(index) => {
                entries.remove(index);
                trace!(%id, "listener unsubscribed");
            }
            None => debug!(%id, "unsubscribe of unknown subscription"),
        }
    }
}

impl<T, F> Default for LocalSignal<T, F>
where
    T: Clone + 'static,
    F: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F> fmt::Debug for LocalSignal<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSignal")
            .field("listeners", &self.entries.borrow().len())
            .field("filtered", &self.predicate.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn recording(log: &Rc<RefCell<Vec<u32>>>) -> Listener<u32> {
        let log = Rc::clone(log);
        Rc::new(move |ev| log.borrow_mut().push(ev))
    }

    #[test]
    fn test_dispatch_reaches_all_in_order() {
        let signal: LocalSignal<u32> = LocalSignal::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let first = recording(&log);
        let second: Listener<u32> = {
            let log = Rc::clone(&log);
            Rc::new(move |ev| log.borrow_mut().push(ev * 10))
        };
        signal.subscribe(first);
        signal.subscribe(second);

        assert_eq!(signal.dispatch(3), 2);
        assert_eq!(*log.borrow(), vec![3, 30]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let signal: LocalSignal<u32> = LocalSignal::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = signal.subscribe(recording(&log));
        assert!(signal.is_subscribed(id));

        signal.unsubscribe(id);
        assert!(!signal.is_subscribed(id));
        assert_eq!(signal.dispatch(1), 0);
        assert!(log.borrow().is_empty());

        signal.unsubscribe(id);
        assert!(signal.is_empty());
    }

    #[test]
    fn test_listener_may_unsubscribe_during_dispatch() {
        let signal: Rc<LocalSignal<u32>> = Rc::new(LocalSignal::new());
        let own_id = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));

        let listener: Listener<u32> = {
            let signal = Rc::clone(&signal);
            let own_id = Rc::clone(&own_id);
            let calls = Rc::clone(&calls);
            Rc::new(move |_| {
                calls.set(calls.get() + 1);
                if let Some(id) = own_id.get() {
                    signal.unsubscribe(id);
                }
            })
        };
        own_id.set(Some(signal.subscribe(listener)));

        assert_eq!(signal.dispatch(1), 1);
        assert_eq!(signal.dispatch(2), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_earlier_listener_removing_later_one_skips_it() {
        let signal: Rc<LocalSignal<u32>> = Rc::new(LocalSignal::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let victim = Rc::new(Cell::new(None));

        let remover: Listener<u32> = {
            let signal = Rc::clone(&signal);
            let victim = Rc::clone(&victim);
            Rc::new(move |_| {
                if let Some(id) = victim.get() {
                    signal.unsubscribe(id);
                }
            })
        };
        signal.subscribe(remover);
        victim.set(Some(signal.subscribe(recording(&log))));

        assert_eq!(signal.dispatch(5), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_predicate_applies_to_filtered_listeners_only() {
        let signal: LocalSignal<u32, u32> = LocalSignal::with_predicate(|min, ev| ev >= min);
        let log = Rc::new(RefCell::new(Vec::new()));
        signal.subscribe_filtered(recording(&log), 10);
        signal.subscribe(recording(&log));

        assert_eq!(signal.dispatch(4), 1);
        assert_eq!(signal.dispatch(12), 2);
        assert_eq!(*log.borrow(), vec![4, 12, 12]);
    }

    #[test]
    fn test_filters_ignored_without_predicate() {
        let signal: LocalSignal<u32, &str> = LocalSignal::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        signal.subscribe_filtered(recording(&log), "anything");
        assert_eq!(signal.dispatch(9), 1);
    }
}
