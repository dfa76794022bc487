use std::time::{Duration, Instant};

/// Upper bound of the sweep arc; the angle wraps to 0 here.
pub const SWEEP_LIMIT_DEG: u16 = 180;

/// Minimum time between angle advances.
pub const ADVANCE_INTERVAL: Duration = Duration::from_millis(30);

/// Result of one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepTick {
    /// Sweep disabled or below the throttle interval; angle unchanged.
    Idle,
    /// Angle advanced to the contained value.
    Advanced(u16),
    /// The advance crossed the arc boundary; angle wrapped to 0.
    CycleComplete,
}

/// Advances the sweep angle once per throttled scheduler tick.
///
/// The scheduler keeps ticking while the sweep is disabled; the elapsed
/// baseline is left alone, so re-enabling advances on the very next tick
/// instead of waiting out a fresh interval.
pub struct SweepEngine {
    angle: u16,
    last_advance: Option<Instant>,
    enabled: bool,
}

impl SweepEngine {
    pub fn new() -> Self {
        Self {
            angle: 0,
            last_advance: None,
            enabled: false,
        }
    }

    pub fn angle(&self) -> u16 {
        self.angle
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn tick(&mut self, now: Instant) -> SweepTick {
        if !self.enabled {
            return SweepTick::Idle;
        }
        let last = match self.last_advance {
            Some(last) => last,
            None => {
                self.last_advance = Some(now);
                return SweepTick::Idle;
            }
        };
        if now.duration_since(last) < ADVANCE_INTERVAL {
            return SweepTick::Idle;
        }
        self.last_advance = Some(now);
        self.angle += 1;
        if self.angle >= SWEEP_LIMIT_DEG {
            self.angle = 0;
            SweepTick::CycleComplete
        } else {
            SweepTick::Advanced(self.angle)
        }
    }
}

impl Default for SweepEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_waits_out_the_throttle_interval() {
        let mut engine = SweepEngine::new();
        engine.set_enabled(true);
        let start = Instant::now();

        assert_eq!(engine.tick(start), SweepTick::Idle);
        assert_eq!(
            engine.tick(start + Duration::from_millis(29)),
            SweepTick::Idle
        );
        assert_eq!(
            engine.tick(start + Duration::from_millis(30)),
            SweepTick::Advanced(1)
        );
    }

    #[test]
    fn angle_is_monotone_and_wraps_with_a_cycle_event() {
        let mut engine = SweepEngine::new();
        engine.set_enabled(true);
        let mut now = Instant::now();
        engine.tick(now);

        for expected in 1..SWEEP_LIMIT_DEG {
            now += ADVANCE_INTERVAL;
            assert_eq!(engine.tick(now), SweepTick::Advanced(expected));
            assert!(engine.angle() < SWEEP_LIMIT_DEG);
        }

        now += ADVANCE_INTERVAL;
        assert_eq!(engine.tick(now), SweepTick::CycleComplete);
        assert_eq!(engine.angle(), 0);
    }

    #[test]
    fn disabled_sweep_freezes_without_losing_its_baseline() {
        let mut engine = SweepEngine::new();
        engine.set_enabled(true);
        let start = Instant::now();
        engine.tick(start);
        engine.tick(start + Duration::from_millis(30));
        assert_eq!(engine.angle(), 1);

        engine.set_enabled(false);
        assert_eq!(
            engine.tick(start + Duration::from_millis(120)),
            SweepTick::Idle
        );
        assert_eq!(engine.angle(), 1);

        // Resumes on the next tick, no restart latency.
        engine.set_enabled(true);
        assert_eq!(
            engine.tick(start + Duration::from_millis(121)),
            SweepTick::Advanced(2)
        );
    }
}
