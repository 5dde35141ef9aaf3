//! Cancellation and deadlines for long-running queries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{QueryError, Result};

/// A shared flag a caller can flip to stop a running query.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        CancellationToken::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Per-call execution limits.
///
/// The default control never cancels and has no deadline.
#[derive(Debug, Clone)]
pub struct ExecutionControl {
    started: Instant,
    deadline: Option<Instant>,
    token: Option<CancellationToken>,
}

impl Default for ExecutionControl {
    fn default() -> Self {
        ExecutionControl {
            started: Instant::now(),
            deadline: None,
            token: None,
        }
    }
}

impl ExecutionControl {
    /// No deadline, no cancellation.
    pub fn unbounded() -> Self {
        ExecutionControl::default()
    }

    /// Stops the query once `timeout` has elapsed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = self.started.checked_add(timeout);
        self
    }

    /// Stops the query at an absolute instant.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Stops the query when the token is cancelled.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Returns `true` if neither a deadline nor a token is set.
    pub fn is_unbounded(&self) -> bool {
        self.deadline.is_none() && self.token.is_none()
    }

    /// Fails if the token fired or the deadline passed.
    pub fn check(&self) -> Result<()> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(QueryError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            let now = Instant::now();
            if now >= deadline {
                return Err(QueryError::DeadlineExceeded {
                    elapsed: now.duration_since(self.started),
                });
            }
        }
        Ok(())
    }
}
