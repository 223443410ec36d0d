//! Cancellation and deadlines for a single call.
//!
//! A `RequestContext` is handed to every client and transport operation.
//! Work driven through [`RequestContext::run`] is abandoned as soon as the
//! attached token is cancelled or the deadline passes, and the reason comes
//! back as a `TransportError`. Dropping the abandoned future is what aborts
//! the in-flight request and releases its connection.

use std::future::{self, Future};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl RequestContext {
    /// A context that never expires and is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets the deadline. An earlier deadline already on the context wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is already done, if it is.
    pub fn err(&self) -> Option<TransportError> {
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Some(TransportError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(TransportError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Drive `fut` to completion unless the context finishes first.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, TransportError> {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => Err(TransportError::Cancelled),
            _ = expired => Err(TransportError::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}
