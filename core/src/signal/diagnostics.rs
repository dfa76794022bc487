use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Serial link speed reported by the console; fixed for the simulated board.
pub const BAUD_RATE: u32 = 115_200;

const VOLTAGE_FLOOR: f32 = 4.9;
const VOLTAGE_CEIL: f32 = 6.2;
const VOLTAGE_STEP: f32 = 0.1;

/// Snapshot shown on the diagnostics panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsReading {
    pub voltage: f32,
    pub uptime_secs: u64,
    pub baud_rate: u32,
}

/// Once-per-second system health ticker.
///
/// Voltage random-walks inside the supply envelope; uptime counts up from
/// the simulated boot offset.
pub struct DiagnosticsMonitor {
    rng: StdRng,
    voltage: f32,
    uptime_secs: u64,
}

impl DiagnosticsMonitor {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            voltage: 5.5,
            uptime_secs: 5247,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            voltage: 5.5,
            uptime_secs: 5247,
        }
    }

    /// Advance one second of simulated board time.
    pub fn tick(&mut self) -> DiagnosticsReading {
        self.uptime_secs += 1;
        let drift = self.rng.gen_range(-VOLTAGE_STEP..VOLTAGE_STEP);
        self.voltage = (self.voltage + drift).clamp(VOLTAGE_FLOOR, VOLTAGE_CEIL);
        self.reading()
    }

    pub fn reading(&self) -> DiagnosticsReading {
        DiagnosticsReading {
            voltage: self.voltage,
            uptime_secs: self.uptime_secs,
            baud_rate: BAUD_RATE,
        }
    }
}

/// Formats an uptime as `1h 27m 27s`.
pub fn format_uptime(secs: u64) -> String {
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_walks_inside_the_supply_envelope() {
        let mut monitor = DiagnosticsMonitor::seeded(3);
        for _ in 0..500 {
            let reading = monitor.tick();
            assert!((VOLTAGE_FLOOR..=VOLTAGE_CEIL).contains(&reading.voltage));
        }
    }

    #[test]
    fn uptime_counts_up_from_boot_offset() {
        let mut monitor = DiagnosticsMonitor::seeded(0);
        assert_eq!(monitor.reading().uptime_secs, 5247);
        monitor.tick();
        monitor.tick();
        assert_eq!(monitor.reading().uptime_secs, 5249);
    }

    #[test]
    fn uptime_formats_hours_minutes_seconds() {
        assert_eq!(format_uptime(5247), "1h 27m 27s");
        assert_eq!(format_uptime(59), "0h 0m 59s");
    }
}
