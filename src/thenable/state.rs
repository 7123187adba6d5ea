//! # Lifecycle state of a future.
//!
//! ```text
//!            fulfill(v)
//!   Pending ───────────► Fulfilled
//!      │
//!      │     reject(r)
//!      └───────────────► Rejected
//! ```
//!
//! Transitions are one-way: once a future leaves `Pending` its state never changes.

use std::fmt;
use std::str::FromStr;

use crate::error::ThenableError;

/// Lifecycle state of a [`Thenable`](crate::Thenable) or event adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromiseState {
    /// Not settled yet.
    Pending,
    /// Settled with a value.
    Fulfilled,
    /// Settled with a rejection reason.
    Rejected,
}

impl PromiseState {
    /// Stable string form: `"pending"`, `"fulfilled"` or `"rejected"`.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            PromiseState::Pending => "pending",
            PromiseState::Fulfilled => "fulfilled",
            PromiseState::Rejected => "rejected",
        }
    }

    /// True only for `Pending`.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, PromiseState::Pending)
    }

    /// True for `Fulfilled` and `Rejected`.
    #[inline]
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for PromiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromiseState {
    type Err = ThenableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PromiseState::Pending),
            "fulfilled" => Ok(PromiseState::Fulfilled),
            "rejected" => Ok(PromiseState::Rejected),
            other => Err(ThenableError::UnknownState {
                value: other.to_string(),
            }),
        }
    }
}
