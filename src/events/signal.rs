//! # Event signal capability.
//!
//! [`EventSignal`] is the minimal contract a host event source exposes to the
//! adapters in [`crate::adapters`]: register a listener (optionally with a filter),
//! get back an opaque [`SubscriptionId`], and later remove it with that id.
//!
//! ## Rules
//! - `subscribe` and `subscribe_filtered` are distinct calls: a signal can always
//!   tell "no filter" apart from "a filter that happens to be empty".
//! - The filter is opaque here and forwarded verbatim.
//! - The id is the only unsubscription token; it does not depend on the listener's
//!   identity.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global sequence for subscription ids.
static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Callback a signal invokes with each delivered event.
pub type Listener<T> = Rc<dyn Fn(T)>;

/// Opaque handle identifying one subscription on one signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates a process-wide unique id.
    pub fn next() -> Self {
        Self(SUBSCRIPTION_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Wraps a raw id minted by a host signal.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Contract for host event sources.
///
/// # Example
/// ```rust
/// use std::cell::RefCell;
/// use thenable::{EventSignal, Listener, SubscriptionId};
///
/// /// Delivers nothing, records calls.
/// #[derive(Default)]
/// struct Recorder {
///     calls: RefCell<Vec<String>>,
/// }
///
/// impl EventSignal for Recorder {
///     type Event = u32;
///     type Filter = Option<u32>;
///
///     fn subscribe(&self, _listener: Listener<u32>) -> SubscriptionId {
///         self.calls.borrow_mut().push("subscribe".into());
///         SubscriptionId::next()
///     }
///
///     fn subscribe_filtered(&self, _listener: Listener<u32>, filter: Option<u32>) -> SubscriptionId {
///         self.calls.borrow_mut().push(format!("subscribe_filtered({filter:?})"));
///         SubscriptionId::next()
///     }
///
///     fn unsubscribe(&self, id: SubscriptionId) {
///         self.calls.borrow_mut().push(format!("unsubscribe({id})"));
///     }
/// }
/// ```
pub trait EventSignal {
    /// Payload delivered to listeners.
    type Event;
    /// Caller-defined filter shape, uninterpreted by the adapters.
    type Filter;

    /// Registers `listener` without a filter.
    fn subscribe(&self, listener: Listener<Self::Event>) -> SubscriptionId;

    /// Registers `listener` with `filter`.
    fn subscribe_filtered(
        &self,
        listener: Listener<Self::Event>,
        filter: Self::Filter,
    ) -> SubscriptionId;

    /// Removes the subscription identified by `id`.
    fn unsubscribe(&self, id: SubscriptionId);
}
