//! Future primitive: state, settlement and chaining.
//!
//! This module groups the **data model** of a single-threaded future and the
//! operations that drive it synchronously.
//!
//! ## Contents
//! - [`PromiseState`] lifecycle enum (`pending` / `fulfilled` / `rejected`)
//! - [`Thenable`] the future itself (settle, chain, flatten)
//! - [`Resolver`] settlement handle given to executors
//! - [`Then`], [`Resolution`] capability of anything that can be adopted
//! - [`ThenableFuture`] bridge to `.await`
//!
//! ## Quick reference
//! ```text
//! Thenable::new(executor) ──► executor(&Resolver) ──► fulfill / reject / adopt
//!        │
//!        ├─► then / then_with / and_then / catch / finally ──► derived Thenable
//!        ├─► state() / value() / reason()                  (synchronous)
//!        └─► .await                                        (Result<T, E>)
//! ```

mod future;
mod resolver;
mod state;
mod then;
#[allow(clippy::module_inception)]
mod thenable;

pub use future::ThenableFuture;
pub use resolver::Resolver;
pub use state::PromiseState;
pub use then::{OnFulfilled, OnRejected, Resolution, Then};
pub use thenable::Thenable;
