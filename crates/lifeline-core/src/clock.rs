//! Strictly increasing wall-clock timestamps.
//!
//! Two triggers in quick succession can read the same instant from the
//! system clock, and a clock step backwards can reorder them. Records
//! must have distinct, ordered timestamps, so every reading is bumped to
//! at least one microsecond after the previous one.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// UTC clock whose readings never repeat or go backwards within a process.
#[derive(Debug)]
pub struct MonotonicClock {
    last_micros: AtomicI64,
}

impl MonotonicClock {
    /// Create a clock with no previous reading.
    pub const fn new() -> Self {
        Self {
            last_micros: AtomicI64::new(i64::MIN),
        }
    }

    /// The current time, strictly after every earlier reading.
    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_micros();
        let mut previous = self.last_micros.load(Ordering::Relaxed);
        loop {
            let next = wall.max(previous.saturating_add(1));
            match self.last_micros.compare_exchange_weak(
                previous,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return DateTime::from_timestamp_micros(next).unwrap_or_else(Utc::now),
                Err(actual) => previous = actual,
            }
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_are_strictly_increasing() {
        let clock = MonotonicClock::new();
        let mut last = clock.now();
        for _ in 0..1000 {
            let next = clock.now();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn first_reading_tracks_wall_clock() {
        let clock = MonotonicClock::new();
        let before = Utc::now().timestamp_micros();
        let reading = clock.now().timestamp_micros();
        assert!(reading >= before);
    }
}
