//! Chaining policies.
//!
//! This module groups the knobs that control **how** a future delivers its outcome
//! to the continuations registered on it.
//!
//! ## Contents
//! - [`ContinuationPolicy`] one overwritable continuation slot, or ordered fan-out
//!
//! ## Quick wiring
//! ```text
//! Config { continuations: ContinuationPolicy, .. }
//!      └─► thenable::Thenable uses:
//!           - continuations.replaces() on every then/catch/finally registration
//! ```
//!
//! ## Defaults
//! - `ContinuationPolicy::Single` (one slot, last registration wins).

mod continuation;

pub use continuation::ContinuationPolicy;
