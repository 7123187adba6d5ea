//! One-shot adapters: futures settled by a single event.
//!
//! This module turns an [`EventSignal`](crate::EventSignal) into a future that
//! completes on the **first** event it delivers.
//!
//! ## Contents
//! - [`EventThenable`] wraps a [`Thenable`](crate::Thenable); chain with `then`/`finally`
//! - [`EventPromise`] native `Future`; consume with `.await`
//!
//! Both share one subscription state machine, so their observable behaviour is
//! identical: one subscribe on creation, one unsubscribe on settlement, later
//! events ignored, `cancel()` fulfills with `None`.
//!
//! ## Lifecycle
//! ```text
//! new / with_filter
//!   └─► signal.subscribe[_filtered](listener) ──► SubscriptionId
//!
//!         Subscribing ──(id returned)──► Armed(id)
//!             │                             │
//!             │ event during subscribe      ├─ first event ──► unsubscribe(id) ─► fulfill(Some(ev))
//!             ▼                             └─ cancel()    ──► unsubscribe(id) ─► fulfill(None)
//!         ClaimedEarly ─(id returned)─► unsubscribe(id)
//!                                                   │
//!                                                   ▼
//!                                                Settled  (further events / cancel: no-op)
//! ```
//!
//! ## Rules
//! - The signal is held weakly: dropping it while pending leaves the adapter pending.
//! - Dropping an adapter does **not** unsubscribe; the listener keeps the shared state alive.

mod binding;
mod event_promise;
mod event_thenable;

pub use event_promise::EventPromise;
pub use event_thenable::EventThenable;
