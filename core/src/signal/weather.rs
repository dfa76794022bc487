use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One randomized reading from the simulated weather station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Degrees Celsius, 10–40.
    pub temperature: f32,
    /// Relative humidity percent, 20–80.
    pub humidity: f32,
    /// Hectopascal, 990–1010.
    pub pressure: f32,
    /// Lux, 0–999.
    pub light: u32,
}

/// Draws independent readings within fixed instrument ranges.
pub struct WeatherStation {
    rng: StdRng,
}

impl WeatherStation {
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

    /// Every call is an independent draw; there is no persisted trend.
    pub fn sample(&mut self) -> WeatherReading {
        WeatherReading {
            temperature: round_tenth(self.rng.gen_range(10.0..40.0)),
            humidity: round_tenth(self.rng.gen_range(20.0..80.0)),
            pressure: round_tenth(self.rng.gen_range(990.0..1010.0)),
            light: self.rng.gen_range(0..1000),
        }
    }
}

fn round_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_stay_within_instrument_ranges() {
        let mut station = WeatherStation::seeded(11);
        for _ in 0..200 {
            let reading = station.sample();
            assert!((10.0..=40.0).contains(&reading.temperature));
            assert!((20.0..=80.0).contains(&reading.humidity));
            assert!((990.0..=1010.0).contains(&reading.pressure));
            assert!(reading.light < 1000);
        }
    }

    #[test]
    fn analog_fields_round_to_one_decimal() {
        let mut station = WeatherStation::seeded(5);
        let reading = station.sample();
        for value in [reading.temperature, reading.humidity, reading.pressure] {
            let scaled = value * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-3);
        }
    }
}
