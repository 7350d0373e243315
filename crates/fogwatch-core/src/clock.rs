//! Time source abstraction.
//!
//! The state machine and map hysteresis work on [`Instant`]s handed to them by
//! the caller. [`Clock`] lets the engine read "now" from either the system or
//! a manually driven clock (replays and tests).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of monotonic time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
///
/// Time is stored as a millisecond offset from a fixed base instant, so the
/// clock can be shared between threads without locking.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset_ms: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.offset_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Set the clock to `offset` past its base instant.
    ///
    /// Used by replays, where every recorded cycle carries its own timestamp.
    pub fn set_offset(&self, offset: Duration) {
        self.offset_ms
            .store(offset.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - start, Duration::from_millis(1500));

        clock.advance(Duration::from_secs(2));
        assert_eq!(clock.offset(), Duration::from_millis(3500));
    }

    #[test]
    fn test_manual_clock_set_offset() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.set_offset(Duration::from_secs(10));
        assert_eq!(clock.now() - start, Duration::from_secs(10));

        // Setting backwards is allowed (replays may restart)
        clock.set_offset(Duration::from_secs(1));
        assert_eq!(clock.now() - start, Duration::from_secs(1));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
