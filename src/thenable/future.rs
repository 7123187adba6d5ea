//! # Awaiting a `Thenable` from async code.
//!
//! [`ThenableFuture`] bridges a [`Thenable`] into Rust's `Future` machinery:
//! `thenable.await` yields `Ok(value)` or `Err(reason)`.
//!
//! ## Rules
//! - The task waker is stored beside the continuations, not in the continuation
//!   slot, so awaiting never replaces a `then` registration.
//! - Polling a settled future returns a clone of the outcome; the future is fused
//!   after the first `Ready`.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::FusedFuture;

use crate::thenable::thenable::Thenable;

/// Future returned by `Thenable::into_future`.
#[must_use = "futures do nothing unless polled"]
pub struct ThenableFuture<T, E> {
    thenable: Thenable<T, E>,
    terminated: bool,
}

impl<T, E> Future for ThenableFuture<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.thenable.poll_outcome(cx.waker()) {
            Some(outcome) => {
                self.terminated = true;
                Poll::Ready(outcome)
            }
            None => Poll::Pending,
        }
    }
}

impl<T, E> FusedFuture for ThenableFuture<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl<T, E> IntoFuture for Thenable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = ThenableFuture<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        ThenableFuture {
            thenable: self,
            terminated: false,
        }
    }
}
