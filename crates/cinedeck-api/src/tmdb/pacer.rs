//! Request pacing for the TMDB API.

use std::time::Duration;

use tokio::time::Instant;

/// Default minimum interval between requests (~40 req/s).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Minimum-interval pacer for outgoing TMDB requests.
///
/// TMDB enforces roughly 40 requests per second per client. The pacer
/// keeps a deadline for the next allowed request; acquiring a slot
/// sleeps until that deadline and pushes it forward.
#[derive(Debug)]
pub(crate) struct RequestPacer {
    /// Minimum spacing between consecutive requests.
    min_interval: Duration,
    /// Earliest instant the next request may be sent.
    next_allowed: Option<Instant>,
}

impl RequestPacer {
    /// Creates a pacer with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_allowed: None,
        }
    }

    /// Creates a pacer with the default interval (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Sleeps until the next request slot opens, then claims it.
    pub(crate) async fn acquire(&mut self) {
        if let Some(deadline) = self.next_allowed
            && deadline > Instant::now()
        {
            tokio::time::sleep_until(deadline).await;
        }
        self.next_allowed = Instant::now().checked_add(self.min_interval);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn test_first_acquire_does_not_wait() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_secs(1));

        // Act
        let start = Instant::now();
        pacer.acquire().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_acquire_enforces_min_interval() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_millis(50));

        // Act
        let start = Instant::now();
        pacer.acquire().await;
        pacer.acquire().await;
        let elapsed = start.elapsed();

        // Assert
        assert!(elapsed >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_acquire_records_next_deadline() {
        // Arrange
        let mut pacer = RequestPacer::new(Duration::from_millis(0));

        // Act
        pacer.acquire().await;

        // Assert
        assert!(pacer.next_allowed.is_some());
    }

    #[test]
    fn test_default_interval() {
        // Arrange & Act
        let pacer = RequestPacer::default_interval();

        // Assert
        assert_eq!(pacer.min_interval, Duration::from_millis(25));
    }
}
