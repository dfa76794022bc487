use rand::{rngs::StdRng, Rng, SeedableRng};

/// Distance returns saturate here; anything at the limit reads as open water.
pub const MAX_ECHO_DISTANCE: f32 = 100.0;

/// Source of simulated echo returns for the sweep.
///
/// The point tracker consults one of these on every angle update; tests
/// substitute a stub to force or suppress detections.
pub trait EchoSource {
    /// Simulated return distance for the given sweep angle, in `[0, 100]`.
    fn sample(&mut self, angle_deg: u16) -> f32;
}

/// Sine-biased noisy echo generator.
///
/// The slow sine term keeps consecutive angles correlated so the scope reads
/// like a moving contour rather than static.
pub struct SimulatedEcho {
    rng: StdRng,
}

impl SimulatedEcho {
    const BASE_DISTANCE: f32 = 60.0;
    const SWING: f32 = 20.0;
    const NOISE: f32 = 15.0;

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl EchoSource for SimulatedEcho {
    fn sample(&mut self, angle_deg: u16) -> f32 {
        let bias = (angle_deg as f32 * 0.1).sin() * Self::SWING;
        let jitter = self.rng.gen_range(-Self::NOISE..Self::NOISE);
        (Self::BASE_DISTANCE + bias + jitter).clamp(0.0, MAX_ECHO_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_stays_within_instrument_range() {
        let mut echo = SimulatedEcho::seeded(7);
        for angle in 0..180 {
            let distance = echo.sample(angle);
            assert!((0.0..=MAX_ECHO_DISTANCE).contains(&distance));
        }
    }

    #[test]
    fn seeded_echo_replays_identically() {
        let mut first = SimulatedEcho::seeded(13);
        let mut second = SimulatedEcho::seeded(13);
        for angle in [0, 45, 90, 135, 179] {
            assert_eq!(first.sample(angle), second.sample(angle));
        }
    }
}
