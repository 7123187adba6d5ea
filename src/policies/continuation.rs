//! # Continuation policy for futures.
//!
//! [`ContinuationPolicy`] decides what happens when `then`/`catch`/`finally` is called
//! more than once on the same pending future.
//!
//! - [`ContinuationPolicy::Single`] one slot; a new registration replaces the previous one (default).
//! - [`ContinuationPolicy::FanOut`] every registration is kept and fired in registration order.
//!
//! ## Choosing the right policy
//!
//! **Linear chains** (each future has one consumer):
//! ```text
//! ContinuationPolicy::Single    → t.then(a).then(b).catch(c)
//! ```
//!
//! **Shared futures** (several consumers observe the same outcome):
//! ```text
//! ContinuationPolicy::FanOut    → t.then(a); t.then(b);   // both a and b fire
//! ```
//!
//! Under `Single`, the replaced continuation never fires and the future it
//! returned stays pending forever:
//! ```text
//! let first  = t.then(a);     // registered
//! let second = t.then(b);     // replaces `a`
//! fulfill(t)                  → b fires, `first` stays Pending
//! ```
//!
//! Continuations registered after settlement fire immediately under both policies.

/// Policy controlling how many continuations a pending future keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContinuationPolicy {
    /// Keep only the most recent registration (default).
    Single,
    /// Keep every registration and fire them in order.
    FanOut,
}

impl Default for ContinuationPolicy {
    /// Returns [`ContinuationPolicy::Single`].
    fn default() -> Self {
        ContinuationPolicy::Single
    }
}

impl ContinuationPolicy {
    /// True if registering replaces what is already queued.
    #[inline]
    pub fn replaces(&self) -> bool {
        matches!(self, ContinuationPolicy::Single)
    }
}
