use std::time::Duration;

use tokio::time::{self, Instant};

// Deadline used when `now + timeout` cannot be represented, roughly 30 years ahead
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Cooperative cancellation token handed to every unit. It carries the instant after
/// which the executor stops waiting for the unit (or records it as timed out in a batch).
///
/// Nothing is ever interrupted: a unit that wants to stop early races its work against
/// [`Deadline::elapsed`] and releases whatever it holds on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline located `timeout` after now. Timeouts too long to be represented are
    /// capped to a far future instant.
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        let at = now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE);

        Self { at }
    }

    pub fn instant(&self) -> Instant {
        self.at
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_elapsed(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Resolves once the deadline is reached
    pub async fn elapsed(&self) {
        time::sleep_until(self.at).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time;

    use crate::concurrency::Deadline;

    #[tokio::test(start_paused = true)]
    async fn remaining_decreases_until_elapsed() {
        let deadline = Deadline::after(Duration::from_secs(2));
        assert!(!deadline.is_elapsed());
        assert_eq!(deadline.remaining(), Duration::from_secs(2));

        time::sleep(Duration::from_secs(1)).await;
        assert!(deadline.remaining() <= Duration::from_secs(1));
        assert!(!deadline.is_elapsed());

        deadline.elapsed().await;
        assert!(deadline.is_elapsed());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_timeout_is_capped() {
        let deadline = Deadline::after(Duration::MAX);

        assert!(!deadline.is_elapsed());
        assert!(deadline.remaining() > Duration::from_secs(86400 * 365));
    }
}
