//! Simulation day clock.
//!
//! The reference scene holds `day` at a constant, so nothing moves frame to
//! frame. [`TimeMode::Advancing`] lets the day grow with simulated time
//! instead.

/// How the day evolves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeMode {
    /// Every frame renders the same day.
    Fixed { day: f64 },
    /// The day starts at `start_day` and advances `days_per_second` per
    /// simulated second.
    Advancing {
        start_day: f64,
        days_per_second: f64,
    },
}

/// Produces the `day` value for each frame.
#[derive(Clone, Debug)]
pub struct DayClock {
    mode: TimeMode,
    elapsed_seconds: f64,
}

impl DayClock {
    pub fn new(mode: TimeMode) -> Self {
        Self {
            mode,
            elapsed_seconds: 0.0,
        }
    }

    /// A clock frozen at `day`.
    pub fn fixed(day: f64) -> Self {
        Self::new(TimeMode::Fixed { day })
    }

    pub fn mode(&self) -> TimeMode {
        self.mode
    }

    /// Advance simulated time by `dt` seconds. No effect on a fixed clock's day.
    pub fn advance(&mut self, dt: f64) {
        self.elapsed_seconds += dt;
    }

    /// The current day.
    pub fn day(&self) -> f64 {
        match self.mode {
            TimeMode::Fixed { day } => day,
            TimeMode::Advancing {
                start_day,
                days_per_second,
            } => start_day + days_per_second * self.elapsed_seconds,
        }
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::fixed(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_ignores_time() {
        let mut clock = DayClock::fixed(100.0);
        for _ in 0..10 {
            clock.advance(1.0 / 60.0);
        }
        assert_eq!(clock.day(), 100.0);
        assert!(clock.elapsed_seconds > 0.0);
    }

    #[test]
    fn test_advancing_clock() {
        let mut clock = DayClock::new(TimeMode::Advancing {
            start_day: 10.0,
            days_per_second: 2.0,
        });
        assert_eq!(clock.day(), 10.0);
        clock.advance(1.5);
        assert!((clock.day() - 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_is_reference_day() {
        assert_eq!(DayClock::default().mode(), TimeMode::Fixed { day: 100.0 });
    }
}
