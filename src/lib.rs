//! # thenable
//!
//! **Thenable** is a small single-threaded future primitive for Rust.
//!
//! It provides a settle-once value holder with synchronous continuations, the
//! Promises/A+ flattening ("adoption") rules expressed through a typed capability,
//! and one-shot adapters that turn the first event of an event source into a future.
//! The crate is designed as a building block for event-loop hosts and UI-style
//! callback code where everything runs on one thread.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌───────────────────┐        ┌────────────────────────────────┐
//!  │ EventSignal (host)│        │ Thenable<T, E>                 │
//!  │ subscribe(_filt.) │        │ - outcome: pending/ok/err      │
//!  │ unsubscribe(id)   │        │ - continuations (Single/FanOut)│
//!  └─────────┬─────────┘        │ - following (adoption chain)   │
//!            │ first event      └──────┬──────────────────┬──────┘
//!            ▼                         │ then/catch/      │ .await
//!  ┌───────────────────┐   fulfill     │ finally/and_then ▼
//!  │ EventThenable     ├──────────────►│            ThenableFuture
//!  │ EventPromise      │  (Future)     ▼
//!  │ (one-shot binding)│          derived Thenable<U, E>
//!  └───────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Thenable::new(executor)
//!   ├─ executor(&Resolver) returns Ok  ─► stays pending or settled by resolver
//!   └─ executor returns Err(reason)    ─► reject(reason) (ignored if already settled)
//!
//! settle(outcome)                       (first call wins, later calls no-op)
//!   ├─► state = fulfilled | rejected
//!   ├─► run registered continuation(s) synchronously
//!   └─► wake tasks awaiting the future
//!
//! then(f) on a settled future ─► f runs immediately, derived future settled
//! then(f) on a pending future ─► stored (Single: replaces, FanOut: appends)
//! ```
//!
//! ## Features
//! | Area             | Description                                                      | Key types / traits                         |
//! |------------------|------------------------------------------------------------------|--------------------------------------------|
//! | **Futures**      | Settle-once value holder with chaining and adoption.             | [`Thenable`], [`Resolver`], [`Then`]       |
//! | **Await**        | Bridge to `async`/`.await` without an executor dependency.       | [`ThenableFuture`]                         |
//! | **Adapters**     | First event of a signal as a future, cancellable.                | [`EventThenable`], [`EventPromise`]        |
//! | **Signals**      | Subscribe/unsubscribe capability and an in-process signal.       | [`EventSignal`], [`LocalSignal`]           |
//! | **Policies**     | Single-slot or fan-out continuations.                            | [`ContinuationPolicy`]                     |
//! | **Errors**       | Typed primitive errors and a type-erased rejection reason.       | [`ThenableError`], [`Rejection`]           |
//! | **Configuration**| Per-future settings inherited by derived futures.                | [`Config`]                                 |
//!
//! ## Example
//! ```rust
//! use std::rc::Rc;
//! use thenable::{EventThenable, LocalSignal, PromiseState, Rejection, Thenable};
//!
//! let answer: Thenable<u32> = Thenable::new(|r| {
//!     r.fulfill(41);
//!     Ok(())
//! });
//! let next = answer.then(|v| Ok(v + 1));
//! assert_eq!(next.value(), Some(42));
//!
//! let failed = next.then(|_| Err::<u32, _>(Rejection::new("boom")));
//! let recovered = failed.catch(|_| Ok(0));
//! assert_eq!(failed.state(), PromiseState::Rejected);
//! assert_eq!(recovered.value(), Some(0));
//!
//! let signal: Rc<LocalSignal<&str>> = Rc::new(LocalSignal::new());
//! let first = EventThenable::<&str>::new(&signal);
//! signal.dispatch("ready");
//! assert_eq!(first.value(), Some(Some("ready")));
//! ```
mod adapters;
mod config;
mod error;
mod events;
mod policies;
mod thenable;

// ---- Public re-exports ----

pub use adapters::{EventPromise, EventThenable};
pub use config::Config;
pub use error::{Rejection, ThenableError};
pub use events::{EventSignal, Listener, LocalSignal, SubscriptionId};
pub use policies::ContinuationPolicy;
pub use thenable::{
    OnFulfilled, OnRejected, PromiseState, Resolution, Resolver, Then, Thenable, ThenableFuture,
};
