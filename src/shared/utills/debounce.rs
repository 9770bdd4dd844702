//! Trailing-edge debouncer
//!
//! Holds at most one pending value. Every [`Debouncer::push`] replaces the
//! pending value and restarts the timer; [`Debouncer::settled`] resolves once
//! the delay has elapsed without another push. Dropping the debouncer drops
//! the pending value, so nothing fires after its owner is gone.

use std::time::Duration;

use tokio::time::Instant;

struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Single-timer debouncer driven by `tokio::time`.
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the timer from zero.
    pub fn push(&mut self, value: T) {
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.delay,
        });
    }

    /// Discard the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait for the pending value to settle.
    ///
    /// Never resolves while nothing is pending. Cancel-safe: the value is
    /// only taken after the deadline has passed, so dropping this future
    /// (e.g. as a losing `select!` branch) leaves the debouncer untouched.
    pub async fn settled(&mut self) -> T {
        let deadline = match &self.pending {
            Some(pending) => pending.deadline,
            None => return std::future::pending().await,
        };

        tokio::time::sleep_until(deadline).await;

        match self.pending.take() {
            Some(pending) => pending.value,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(400);

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();
        debouncer.push("abc");

        assert_eq!(debouncer.settled().await, "abc");
        assert!(start.elapsed() >= DELAY);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn push_restarts_timer_and_keeps_latest_value() {
        let mut debouncer = Debouncer::new(DELAY);
        let start = Instant::now();

        debouncer.push("a");
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.push("ab");
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.push("abc");

        assert_eq!(debouncer.settled().await, "abc");
        assert!(start.elapsed() >= Duration::from_millis(300) + DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_pending_never_settles() {
        let mut debouncer: Debouncer<&str> = Debouncer::new(DELAY);
        let outcome = tokio::time::timeout(Duration::from_secs(5), debouncer.settled()).await;
        assert!(outcome.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.push("abc");
        assert_eq!(debouncer.cancel(), Some("abc"));

        let outcome = tokio::time::timeout(DELAY * 3, debouncer.settled()).await;
        assert!(outcome.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_settle_future_keeps_value() {
        let mut debouncer = Debouncer::new(DELAY);
        debouncer.push("abc");

        let early = tokio::time::timeout(Duration::from_millis(100), debouncer.settled()).await;
        assert!(early.is_err());
        assert!(debouncer.is_pending());

        assert_eq!(debouncer.settled().await, "abc");
    }
}
