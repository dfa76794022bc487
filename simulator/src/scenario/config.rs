use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Parameters for one scripted console session.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Seed for the echo generator so runs replay consistently.
    pub seed: u64,
    /// Number of sweep scheduler ticks to drive.
    pub sweep_ticks: u32,
    /// Scheduler tick interval in milliseconds.
    pub tick_ms: u64,
    /// Simulated sonar spin-up/spin-down latency.
    pub activation_latency_ms: u64,
    /// Answer the safety dialog with "confirm" instead of aborting.
    pub auto_confirm_safety: bool,
    /// Tick the "don't ask again this session" box while confirming.
    pub disable_safety_warning: bool,
    /// Run the scripted control-panel exercise after activation.
    pub exercise_controls: bool,
    pub username: String,
    pub password: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            sweep_ticks: 360,
            tick_ms: 30,
            activation_latency_ms: 2000,
            auto_confirm_safety: true,
            disable_safety_warning: false,
            exercise_controls: true,
            username: "Admin".into(),
            password: "Aa123456".into(),
        }
    }
}

impl ScenarioConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading scenario {}", path_ref.display()))?;
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing scenario {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn activation_latency(&self) -> Duration {
        Duration::from_millis(self.activation_latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_describe_a_complete_session() {
        let config = ScenarioConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(30));
        assert_eq!(config.activation_latency(), Duration::from_millis(2000));
        assert!(config.auto_confirm_safety);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"seed: 9\nsweep_ticks: 50\ndisable_safety_warning: true\n")
            .unwrap();
        let path = temp.into_temp_path();
        let config = ScenarioConfig::load(&path).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.sweep_ticks, 50);
        assert!(config.disable_safety_warning);
        // Unlisted fields fall back to defaults.
        assert_eq!(config.username, "Admin");
    }
}
