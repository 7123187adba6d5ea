//! Event sources: the signal capability and an in-process implementation.
//!
//! This module groups the **contract** adapters depend on and a small host-side
//! implementation of it.
//!
//! ## Contents
//! - [`EventSignal`], [`Listener`], [`SubscriptionId`] subscribe/unsubscribe capability
//! - [`LocalSignal`] synchronous single-threaded signal with optional filter predicate
//!
//! ## Quick reference
//! - **Implementors**: host event registries (external), [`LocalSignal`].
//! - **Consumers**: [`EventThenable`](crate::EventThenable) and
//!   [`EventPromise`](crate::EventPromise), one subscription each.
//!
//! See `adapters/mod.rs` for the subscription lifecycle.

mod local;
mod signal;

pub use local::LocalSignal;
pub use signal::{EventSignal, Listener, SubscriptionId};
