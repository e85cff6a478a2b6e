//! Wall-clock time since startup.
//!
//! The rotation is a function of elapsed milliseconds, never of the frame
//! counter, so the mesh spins at the same speed at any frame rate.

use std::time::{Duration, Instant};

/// Milliseconds since an epoch fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct TimeClock {
    start: Instant,
}

impl TimeClock {
    /// Starts the epoch now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start }
    }

    /// Milliseconds since the epoch, saturating at `u64::MAX`.
    pub fn elapsed_ms(&self) -> u64 {
        millis(Instant::now().saturating_duration_since(self.start))
    }
}

impl Default for TimeClock {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_counts_from_start() {
        let clock = TimeClock::starting_at(Instant::now() - Duration::from_millis(1500));
        assert!(clock.elapsed_ms() >= 1500);
    }

    #[test]
    fn elapsed_never_decreases() {
        let clock = TimeClock::new();
        let first = clock.elapsed_ms();
        assert!(clock.elapsed_ms() >= first);
    }

    #[test]
    fn future_epoch_reads_zero() {
        let clock = TimeClock::starting_at(Instant::now() + Duration::from_secs(60));
        assert_eq!(clock.elapsed_ms(), 0);
    }
}
