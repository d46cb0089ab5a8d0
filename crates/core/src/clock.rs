//! Clock module - fixed-rate cycle accumulator
//!
//! Gravity runs in "cycles" whose rate is independent of the host frame rate.
//! The host calls [`Clock::update_at`] every frame (also while paused); the clock
//! converts wall time into whole elapsed cycles and carries the remainder
//! over, so no time is lost between frames.
//!
//! Every time-dependent method takes an explicit [`Instant`] so tests can
//! drive the clock without sleeping.

use std::time::{Duration, Instant};

/// Shortest period a clock will accept
const MIN_PERIOD: Duration = Duration::from_nanos(1);

#[derive(Debug, Clone)]
pub struct Clock {
    period: Duration,
    cycles_per_second: f32,
    last_update: Instant,
    elapsed_cycles: u32,
    leftover: Duration,
    paused: bool,
}

impl Clock {
    /// Create a running clock ticking `cycles_per_second` times per second
    pub fn new(cycles_per_second: f32) -> Self {
        Self::new_at(cycles_per_second, Instant::now())
    }

    pub fn new_at(cycles_per_second: f32, now: Instant) -> Self {
        let mut clock = Self {
            period: Duration::from_secs(1),
            cycles_per_second: 1.0,
            last_update: now,
            elapsed_cycles: 0,
            leftover: Duration::ZERO,
            paused: false,
        };
        clock.set_cycles_per_second(cycles_per_second);
        clock
    }

    /// Change the rate. Elapsed cycles and leftover time are kept.
    ///
    /// Non-finite or non-positive rates are ignored, as are rates so slow
    /// that one period does not fit in a [`Duration`].
    pub fn set_cycles_per_second(&mut self, cycles_per_second: f32) {
        if !cycles_per_second.is_finite() || cycles_per_second <= 0.0 {
            return;
        }
        let Ok(period) = Duration::try_from_secs_f64(1.0 / cycles_per_second as f64) else {
            return;
        };
        self.cycles_per_second = cycles_per_second;
        self.period = period.max(MIN_PERIOD);
    }

    pub fn cycles_per_second(&self) -> f32 {
        self.cycles_per_second
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Zero the counters, re-stamp and unpause
    pub fn reset_at(&mut self, now: Instant) {
        self.elapsed_cycles = 0;
        self.leftover = Duration::ZERO;
        self.last_update = now;
        self.paused = false;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Accumulate time up to `now`.
    ///
    /// While paused the time is discarded, but `last_update` still moves so
    /// that unpausing does not release the paused interval as cycles.
    pub fn update_at(&mut self, now: Instant) {
        let delta = now.saturating_duration_since(self.last_update) + self.leftover;
        if !self.paused {
            let period = self.period.as_nanos();
            let total = delta.as_nanos();
            let cycles = total / period;
            self.elapsed_cycles = self
                .elapsed_cycles
                .saturating_add(u32::try_from(cycles).unwrap_or(u32::MAX));
            self.leftover = Duration::from_nanos((total % period) as u64);
        }
        self.last_update = now;
    }

    /// Consume one elapsed cycle, if any
    pub fn has_elapsed_cycle(&mut self) -> bool {
        if self.elapsed_cycles > 0 {
            self.elapsed_cycles -= 1;
            true
        } else {
            false
        }
    }

    /// Whether a cycle is pending, without consuming it
    pub fn peek_elapsed_cycle(&self) -> bool {
        self.elapsed_cycles > 0
    }

    /// Cycles accumulated and not yet consumed
    pub fn elapsed_cycles(&self) -> u32 {
        self.elapsed_cycles
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(crate::types::BASE_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_whole_cycles() {
        let t0 = Instant::now();
        let mut clock = Clock::new_at(1.0, t0);

        clock.update_at(t0 + Duration::from_millis(2500));
        assert_eq!(clock.elapsed_cycles(), 2);
        assert!(clock.has_elapsed_cycle());
        assert!(clock.has_elapsed_cycle());
        assert!(!clock.has_elapsed_cycle());

        // The 500ms leftover carries into the next update.
        clock.update_at(t0 + Duration::from_millis(3000));
        assert_eq!(clock.elapsed_cycles(), 1);
    }

    #[test]
    fn test_peek_does_not_consume() {
        let t0 = Instant::now();
        let mut clock = Clock::new_at(10.0, t0);
        clock.update_at(t0 + Duration::from_millis(100));
        assert!(clock.peek_elapsed_cycle());
        assert!(clock.peek_elapsed_cycle());
        assert!(clock.has_elapsed_cycle());
        assert!(!clock.peek_elapsed_cycle());
    }

    #[test]
    fn test_paused_discards_time() {
        let t0 = Instant::now();
        let mut clock = Clock::new_at(1.0, t0);
        clock.set_paused(true);
        clock.update_at(t0 + Duration::from_secs(5));
        assert_eq!(clock.elapsed_cycles(), 0);

        clock.set_paused(false);
        clock.update_at(t0 + Duration::from_millis(5500));
        assert_eq!(clock.elapsed_cycles(), 0);
        clock.update_at(t0 + Duration::from_millis(6000));
        assert_eq!(clock.elapsed_cycles(), 1);
    }

    #[test]
    fn test_reset_clears_and_unpauses() {
        let t0 = Instant::now();
        let mut clock = Clock::new_at(1.0, t0);
        clock.update_at(t0 + Duration::from_millis(1700));
        clock.set_paused(true);

        let t1 = t0 + Duration::from_secs(2);
        clock.reset_at(t1);
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed_cycles(), 0);
        clock.update_at(t1 + Duration::from_millis(999));
        assert_eq!(clock.elapsed_cycles(), 0);
    }

    #[test]
    fn test_rate_change_keeps_counters() {
        let t0 = Instant::now();
        let mut clock = Clock::new_at(1.0, t0);
        clock.update_at(t0 + Duration::from_millis(1000));
        clock.set_cycles_per_second(25.0);
        assert_eq!(clock.elapsed_cycles(), 1);
        assert_eq!(clock.period(), Duration::from_millis(40));
        clock.update_at(t0 + Duration::from_millis(1080));
        assert_eq!(clock.elapsed_cycles(), 3);
    }

    #[test]
    fn test_invalid_rate_ignored() {
        let mut clock = Clock::new(2.0);
        clock.set_cycles_per_second(0.0);
        clock.set_cycles_per_second(-1.0);
        clock.set_cycles_per_second(f32::NAN);
        assert_eq!(clock.cycles_per_second(), 2.0);
    }

    #[test]
    fn test_unrepresentable_period_ignored() {
        let mut clock = Clock::new(2.0);
        clock.set_cycles_per_second(1.0e-30);
        clock.set_cycles_per_second(f32::MIN_POSITIVE);
        assert_eq!(clock.cycles_per_second(), 2.0);
        assert_eq!(clock.period(), Duration::from_millis(500));

        // Slow but representable rates still apply.
        clock.set_cycles_per_second(crate::types::MIN_SPEED);
        assert_eq!(clock.cycles_per_second(), crate::types::MIN_SPEED);
        assert!(clock.period() > Duration::from_secs(900_000));
    }
}
