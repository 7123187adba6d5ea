//! # One-shot subscription shared by both adapters.
//!
//! [`OneShot`] owns the single subscription an adapter holds on an
//! [`EventSignal`] and guarantees it is released exactly once, on whichever of
//! event arrival or `cancel()` happens first.
//!
//! ## Internal scheme
//! ```text
//! bind():   Subscribing ──subscribe*()──► Armed(id)
//!
//! claim():  Armed(id)    ──► Settled       + unsubscribe(id)       → true
//!           Subscribing  ──► ClaimedEarly  (event during subscribe) → true
//!           otherwise                                              → false
//!
//! arm(id):  Subscribing  ──► Armed(id)
//!           ClaimedEarly ──► Settled       + unsubscribe(id)
//!
//! deliver(event) = claim() ? settle(Some(event)) : ignore
//! cancel()       = claim() ? settle(None)        : no-op
//! detach()       = claim()                       (target settled elsewhere)
//! ```
//!
//! The signal is held weakly: an adapter never keeps a host signal alive.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::events::{EventSignal, Listener, SubscriptionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    /// `subscribe*` has not returned yet.
    Subscribing,
    /// Subscribed and unclaimed.
    Armed(SubscriptionId),
    /// Claimed before the id was known; release happens in `arm`.
    ClaimedEarly,
    /// Claimed and released.
    Settled,
}

pub(crate) struct OneShot<T> {
    slot: RefCell<Slot>,
    release: Box<dyn Fn(SubscriptionId)>,
    settle: Box<dyn Fn(Option<T>)>,
}

impl<T: 'static> OneShot<T> {
    /// Subscribes to `signal` (filtered only if `filter` is given) and returns the binding.
    ///
    /// `settle` is called exactly once: with `Some(event)` on the first delivery or
    /// with `None` on cancellation.
    pub(crate) fn bind<S, G>(signal: &Rc<S>, filter: Option<S::Filter>, settle: G) -> Rc<Self>
    where
        S: EventSignal<Event = T> + ?Sized + 'static,
        G: Fn(Option<T>) + 'static,
    {
        let weak = Rc::downgrade(signal);
        let release: Box<dyn Fn(SubscriptionId)> = Box::new(move |id| match weak.upgrade() {
            Some(signal) => signal.unsubscribe(id),
            None => debug!(%id, "signal dropped before release"),
        });
        let binding = Rc::new(Self {
            slot: RefCell::new(Slot::Subscribing),
            release,
            settle: Box::new(settle),
        });

        let listener: Listener<T> = {
            let binding = Rc::clone(&binding);
            Rc::new(move |event| binding.deliver(event))
        };
        let id = match filter {
            Some(filter) => signal.subscribe_filtered(listener, filter),
            None => signal.subscribe(listener),
        };
        trace!(%id, "adapter subscribed");
        binding.arm(id);
        binding
    }

    /// Settles with `None` unless already settled. Returns whether it did.
    pub(crate) fn cancel(&self) -> bool {
        if !self.claim() {
            trace!("cancel after settlement ignored");
            return false;
        }
        trace!("adapter cancelled");
        (self.settle)(None);
        true
    }

    /// Releases the subscription without calling `settle`, for a target that was
    /// settled through another path. Returns whether it did.
    pub(crate) fn detach(&self) -> bool {
        if !self.claim() {
            return false;
        }
        debug!("target settled outside the binding; subscription released");
        true
    }

    pub(crate) fn is_settled(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::ClaimedEarly | Slot::Settled)
    }

    fn deliver(&self, event: T) {
        if !self.claim() {
            trace!("event after settlement ignored");
            return;
        }
        trace!("adapter received event");
        (self.settle)(Some(event));
    }

    fn claim(&self) -> bool {
        let release = {
            let mut slot = self.slot.borrow_mut();
            match *slot {
                Slot::Armed(id) => {
                    *slot = Slot::Settled;
                    Some(id)
                }
                Slot::Subscribing => {
                    *slot = Slot::ClaimedEarly;
                    None
                }
                Slot::ClaimedEarly | Slot::Settled => return false,
            }
        };
        if let Some(id) = release {
            (self.release)(id);
        }
        true
    }

    fn arm(&self, id: SubscriptionId) {
        let release = {
            let mut slot = self.slot.borrow_mut();
            match *slot {
                Slot::Subscribing => {
                    *slot = Slot::Armed(id);
                    false
                }
                Slot::ClaimedEarly => {
                    *slot = Slot::Settled;
                    true
                }
                Slot::Armed(_) | Slot::Settled => false,
            }
        };
        if release {
            (self.release)(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Delivers one event from inside `subscribe`.
    struct Eager {
        unsubscribed: RefCell<Vec<SubscriptionId>>,
        issued: Cell<Option<SubscriptionId>>,
    }

    impl EventSignal for Eager {
        type Event = u8;
        type Filter = ();

        fn subscribe(&self, listener: Listener<u8>) -> SubscriptionId {
            listener(1);
            let id = SubscriptionId::next();
            self.issued.set(Some(id));
            id
        }

        fn subscribe_filtered(&self, listener: Listener<u8>, _filter: ()) -> SubscriptionId {
            self.subscribe(listener)
        }

        fn unsubscribe(&self, id: SubscriptionId) {
            self.unsubscribed.borrow_mut().push(id);
        }
    }

    #[test]
    fn test_event_during_subscribe_releases_after_arm() {
        let signal = Rc::new(Eager {
            unsubscribed: RefCell::new(Vec::new()),
            issued: Cell::new(None),
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let binding = OneShot::bind(&signal, None, move |ev| sink.borrow_mut().push(ev));

        assert!(binding.is_settled());
        assert_eq!(*seen.borrow(), vec![Some(1)]);
        assert_eq!(*signal.unsubscribed.borrow(), vec![signal.issued.get().unwrap()]);

        assert!(!binding.cancel());
        assert_eq!(signal.unsubscribed.borrow().len(), 1);
    }

    #[test]
    fn test_detach_releases_without_settling() {
        let signal: Rc<crate::events::LocalSignal<u8>> = Rc::new(Default::default());
        let settled = Rc::new(Cell::new(0));
        let count = Rc::clone(&settled);
        let binding = OneShot::bind(&signal, None, move |_| count.set(count.get() + 1));

        assert!(binding.detach());
        assert!(binding.is_settled());
        assert!(signal.is_empty());
        assert!(!binding.detach());
        assert!(!binding.cancel());
        assert_eq!(settled.get(), 0);
    }

    #[test]
    fn test_release_skipped_when_signal_dropped() {
        let signal: Rc<crate::events::LocalSignal<u8>> = Rc::new(Default::default());
        let settled = Rc::new(Cell::new(0));
        let count = Rc::clone(&settled);
        let binding = OneShot::bind(&signal, None, move |_| count.set(count.get() + 1));
        drop(signal);

        assert!(binding.cancel());
        assert_eq!(settled.get(), 1);
    }
}
