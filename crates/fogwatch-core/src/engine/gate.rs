use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::timing;

/// Why a cycle could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// The previous cycle is still running.
    Busy,
    /// The previous cycle ended less than the minimum spacing ago.
    Throttled,
}

/// Allows one detection cycle at a time, spaced from the end of the last one.
///
/// Ticks that cannot start a cycle are dropped, never queued.
#[derive(Debug)]
pub struct CycleGate {
    busy: AtomicBool,
    last_end: Mutex<Option<Instant>>,
    spacing: Duration,
}

impl Default for CycleGate {
    fn default() -> Self {
        Self::new(timing::MIN_CYCLE_SPACING)
    }
}

impl CycleGate {
    pub fn new(spacing: Duration) -> Self {
        Self {
            busy: AtomicBool::new(false),
            last_end: Mutex::new(None),
            spacing,
        }
    }

    /// Try to start a cycle at `now`.
    ///
    /// The returned guard must be finished with the cycle's end time; a guard
    /// dropped without [`CycleGuard::finish`] releases the lock without
    /// recording an end.
    pub fn try_begin(&self, now: Instant) -> Result<CycleGuard<'_>, Refusal> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Refusal::Busy);
        }

        let throttled = self
            .last_end()
            .is_some_and(|end| now.saturating_duration_since(end) < self.spacing);
        if throttled {
            self.busy.store(false, Ordering::Release);
            return Err(Refusal::Throttled);
        }

        Ok(CycleGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn last_end(&self) -> Option<Instant> {
        match self.last_end.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn record_end(&self, at: Instant) {
        match self.last_end.lock() {
            Ok(mut guard) => *guard = Some(at),
            Err(poisoned) => *poisoned.into_inner() = Some(at),
        }
    }
}

/// Holds the gate for one running cycle.
#[derive(Debug)]
pub struct CycleGuard<'a> {
    gate: &'a CycleGate,
}

impl CycleGuard<'_> {
    /// Record the end of the cycle and release the gate.
    pub fn finish(self, at: Instant) {
        self.gate.record_end(at);
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cycle_at_a_time() {
        let gate = CycleGate::default();
        let t0 = Instant::now();

        let guard = gate.try_begin(t0).unwrap();
        assert!(gate.is_busy());
        assert_eq!(gate.try_begin(t0).unwrap_err(), Refusal::Busy);

        guard.finish(t0);
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_spacing_from_end_of_last_cycle() {
        let gate = CycleGate::default();
        let t0 = Instant::now();

        gate.try_begin(t0).unwrap().finish(t0 + Duration::from_millis(300));

        let early = t0 + Duration::from_millis(1_200);
        assert_eq!(gate.try_begin(early).unwrap_err(), Refusal::Throttled);
        assert!(!gate.is_busy());

        assert!(gate.try_begin(t0 + Duration::from_millis(1_300)).is_ok());
    }

    #[test]
    fn test_dropped_guard_releases_without_end() {
        let gate = CycleGate::new(Duration::from_secs(1));
        let t0 = Instant::now();

        drop(gate.try_begin(t0).unwrap());
        assert!(!gate.is_busy());
        assert!(gate.last_end().is_none());
        assert!(gate.try_begin(t0).is_ok());
    }
}
