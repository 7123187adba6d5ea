//! # Future configuration.
//!
//! Provides [`Config`], the settings a [`Thenable`](crate::Thenable) is created with.
//!
//! Config is used in two ways:
//! 1. **Explicit creation**: `Thenable::with_config(config, executor)` / `Thenable::pending_with(config)`
//! 2. **Inheritance**: every future returned by `then`/`catch`/`finally`/`and_then` copies the
//!    config of the future it was derived from.
//!
//! ## Sentinel values
//! - `max_adoption_depth = 0` → unlimited (adoption chains are walked to their end)

use crate::policies::ContinuationPolicy;

/// Per-future configuration.
///
/// ## Field semantics
/// - `continuations`: what a second `then` on a pending future does (replace / append)
/// - `max_adoption_depth`: longest chain of pending adoptions walked for cycle detection (`0` = unlimited)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// How continuations registered on the same pending future are kept.
    pub continuations: ContinuationPolicy,

    /// Maximum number of pending-adoption links followed when a future adopts a
    /// [`Thenable`](crate::Thenable).
    ///
    /// - `0` = unlimited
    /// - `n > 0` = adopting a future whose chain is longer than `n` fails with
    ///   [`ThenableError::AdoptionTooDeep`](crate::ThenableError::AdoptionTooDeep)
    pub max_adoption_depth: usize,
}

impl Config {
    /// Returns the adoption chain bound as an `Option`.
    ///
    /// - `None` → unlimited
    /// - `Some(n)` → at most `n` links
    #[inline]
    pub fn adoption_limit(&self) -> Option<usize> {
        if self.max_adoption_depth == 0 {
            None
        } else {
            Some(self.max_adoption_depth)
        }
    }

    /// Config with [`ContinuationPolicy::FanOut`] and default limits.
    #[inline]
    pub fn fan_out() -> Self {
        Self {
            continuations: ContinuationPolicy::FanOut,
            ..Self::default()
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `continuations = ContinuationPolicy::Single`
    /// - `max_adoption_depth = 1024`
    fn default() -> Self {
        Self {
            continuations: ContinuationPolicy::default(),
            max_adoption_depth: 1024,
        }
    }
}
