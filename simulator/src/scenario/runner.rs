use crate::scenario::config::ScenarioConfig;
use anyhow::Context;
use log::{info, warn};
use nexuscore::activation::ActivationMachine;
use nexuscore::audio::{ring_quietly, LogChime};
use nexuscore::auth::{Authenticator, SessionStore};
use nexuscore::controls::{ControlPanel, ToggleError, ToggleOutcome};
use nexuscore::notify::{MemoryNotifier, Notice, Notifier};
use nexuscore::prelude::{SonarPhase, SonarStatus};
use nexuscore::signal::{
    DiagnosticsMonitor, DiagnosticsReading, EchoSource, SimulatedEcho, WeatherReading,
    WeatherStation,
};
use nexuscore::sweep::{SweepEngine, SweepTick};
use nexuscore::telemetry::MetricsRecorder;
use nexuscore::tracker::PointTracker;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Summary of one scripted session.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub authenticated_as: String,
    pub sweeps_completed: usize,
    pub points_spawned: usize,
    pub points_expired: usize,
    pub points_live_at_end: usize,
    pub transitions_completed: usize,
    pub toggles_rejected: usize,
    pub final_phase: SonarPhase,
    pub weather: WeatherReading,
    pub diagnostics: DiagnosticsReading,
    pub notices: Vec<Notice>,
}

/// Drives a full console session against the core: login, safety gate,
/// activation, the timed sweep loop, deactivation and logout.
pub struct Runner {
    config: ScenarioConfig,
}

impl Runner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub async fn run<S: SessionStore>(&self, store: S) -> anyhow::Result<ScenarioReport> {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut auth = Authenticator::restore(store);

        if !auth.is_authenticated() {
            match auth.login(&self.config.username, &self.config.password) {
                Ok(session) => notifier.notify(Notice::info(
                    "Login successful",
                    format!("Welcome back, {}", session.username),
                )),
                Err(err) => {
                    notifier.notify(Notice::destructive(
                        "Authentication failed",
                        "Invalid username or password",
                    ));
                    anyhow::bail!("scenario aborted: {err}");
                }
            }
        }

        let machine = Arc::new(ActivationMachine::new(self.config.activation_latency()));
        let panel = Arc::new(Mutex::new(ControlPanel::defaults()));
        let metrics = Arc::new(MetricsRecorder::new());

        // Linked controls follow the published status instead of polling.
        let mirror = tokio::spawn(mirror_linked_controls(
            machine.subscribe(),
            panel.clone(),
            notifier.clone(),
        ));

        if machine.needs_confirmation() {
            if !self.config.auto_confirm_safety {
                anyhow::bail!("sonar activation cancelled at the safety prompt");
            }
            info!("safety prompt auto-confirmed by scenario");
            if self.config.disable_safety_warning {
                machine.disable_safety_warning();
            }
        }

        notifier.notify(Notice::info(
            "Activating sonar...",
            "Please wait while the system initializes",
        ));
        machine.activate().await.context("activating sonar")?;
        metrics.record_transition();
        notifier.notify(Notice::info("Sonar activated", "System is now operational"));
        tokio::task::yield_now().await;

        if self.config.exercise_controls {
            self.exercise_panel(&machine, &panel, &notifier, &metrics);
        }

        let mut weather_station = WeatherStation::seeded(self.config.seed);
        let weather = weather_station.sample();
        let mut diagnostics = DiagnosticsMonitor::seeded(self.config.seed);

        let mut engine = SweepEngine::new();
        engine.set_enabled(true);
        let mut echo = SimulatedEcho::seeded(self.config.seed);
        let mut tracker = PointTracker::new();
        let chime = LogChime;

        let tick = self.config.tick_interval();
        let ticks_per_second = (1000 / self.config.tick_ms.max(1)).max(1) as u32;
        for index in 0..self.config.sweep_ticks {
            tokio::time::sleep(tick).await;
            let now = tokio::time::Instant::now().into_std();

            match engine.tick(now) {
                SweepTick::Idle => {}
                SweepTick::Advanced(angle) => {
                    let distance = echo.sample(angle);
                    if tracker.observe(angle, distance, now).is_some() {
                        metrics.record_point_spawned();
                    }
                }
                SweepTick::CycleComplete => {
                    metrics.record_sweep();
                    ring_quietly(&chime);
                    // The wrap is an angle update too.
                    let distance = echo.sample(0);
                    if tracker.observe(0, distance, now).is_some() {
                        metrics.record_point_spawned();
                    }
                }
            }
            metrics.record_points_expired(tracker.expire(now));

            if index % ticks_per_second == 0 {
                diagnostics.tick();
            }
        }
        engine.set_enabled(false);

        machine.deactivate().await.context("deactivating sonar")?;
        metrics.record_transition();
        notifier.notify(Notice::info(
            "Sonar deactivated",
            "System is now in standby mode",
        ));
        tokio::task::yield_now().await;
        mirror.abort();

        let authenticated_as = auth.session().username.clone();
        auth.logout();
        notifier.notify(Notice::info(
            "Logged out",
            "You have been logged out successfully",
        ));

        let snapshot = metrics.snapshot();
        Ok(ScenarioReport {
            authenticated_as,
            sweeps_completed: snapshot.sweeps_completed,
            points_spawned: snapshot.points_spawned,
            points_expired: snapshot.points_expired,
            points_live_at_end: tracker.points().len(),
            transitions_completed: snapshot.transitions_completed,
            toggles_rejected: snapshot.toggles_rejected,
            final_phase: machine.phase(),
            weather,
            diagnostics: diagnostics.reading(),
            notices: notifier.drain(),
        })
    }

    /// Scripted pass over the panel: a standard actuator flips freely, a
    /// sonar-linked one refuses to shut down while the sonar runs.
    fn exercise_panel(
        &self,
        machine: &ActivationMachine,
        panel: &Mutex<ControlPanel>,
        notifier: &MemoryNotifier,
        metrics: &MetricsRecorder,
    ) {
        let Ok(mut panel) = panel.lock() else {
            return;
        };

        match panel.toggle(1, machine.phase()) {
            Ok(ToggleOutcome::Applied {
                name, is_active, ..
            }) => notifier.notify(toggle_notice(&name, is_active)),
            other => warn!("unexpected standard toggle outcome: {other:?}"),
        }

        match panel.toggle(4, machine.phase()) {
            Err(ToggleError::LockedBySonar { name }) => {
                metrics.record_rejected_toggle();
                notifier.notify(Notice::destructive(
                    "Control locked",
                    format!("{name} cannot be switched off while the sonar is active"),
                ));
            }
            other => warn!("unexpected linked toggle outcome: {other:?}"),
        }
    }
}

fn toggle_notice(name: &str, is_active: bool) -> Notice {
    let verb = if is_active { "Activated" } else { "Deactivated" };
    let state = if is_active { "ON" } else { "OFF" };
    let title = format!("{name} {verb}");
    let description = format!("The {} is now {state}", name.to_lowercase());
    if is_active {
        Notice::info(title, description)
    } else {
        Notice::destructive(title, description)
    }
}

async fn mirror_linked_controls(
    mut status: watch::Receiver<SonarStatus>,
    panel: Arc<Mutex<ControlPanel>>,
    notifier: Arc<MemoryNotifier>,
) {
    while status.changed().await.is_ok() {
        let phase = status.borrow_and_update().phase;
        if let Ok(mut panel) = panel.lock() {
            for change in panel.apply_sonar_phase(phase) {
                notifier.notify(toggle_notice(&change.name, change.is_active));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexuscore::auth::MemorySessionStore;
    use nexuscore::notify::Severity;

    fn fast_config() -> ScenarioConfig {
        ScenarioConfig {
            seed: 3,
            sweep_ticks: 200,
            activation_latency_ms: 50,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runner_completes_a_full_session() {
        let store = MemorySessionStore::new();
        let report = Runner::new(fast_config()).run(&store).await.unwrap();

        assert_eq!(report.authenticated_as, "Admin");
        assert_eq!(report.final_phase, SonarPhase::Standby);
        assert!(report.sweeps_completed >= 1);
        assert!(report.points_spawned > 0);
        assert_eq!(report.toggles_rejected, 1);
        assert_eq!(report.transitions_completed, 2);
        // Logout removed the session entry.
        assert!(store.load().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn linked_controls_follow_the_activation_cycle() {
        let config = ScenarioConfig {
            exercise_controls: false,
            sweep_ticks: 1,
            activation_latency_ms: 10,
            ..Default::default()
        };
        let report = Runner::new(config)
            .run(MemorySessionStore::new())
            .await
            .unwrap();

        let titles: Vec<&str> = report
            .notices
            .iter()
            .map(|notice| notice.title.as_str())
            .collect();
        assert!(titles.contains(&"Cooling Fan Activated"));
        assert!(titles.contains(&"Transducer Activated"));
        assert!(titles.contains(&"Cooling Fan Deactivated"));
        assert!(titles.contains(&"Transducer Deactivated"));
    }

    #[tokio::test(start_paused = true)]
    async fn bad_credentials_abort_with_no_session_entry() {
        let config = ScenarioConfig {
            password: "wrong".into(),
            ..Default::default()
        };
        let store = MemorySessionStore::new();
        let err = Runner::new(config).run(&store).await.unwrap_err();

        assert!(err.to_string().contains("scenario aborted"));
        assert!(store.load().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_safety_prompt_stops_before_initializing() {
        let config = ScenarioConfig {
            auto_confirm_safety: false,
            ..Default::default()
        };
        let err = Runner::new(config)
            .run(MemorySessionStore::new())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("safety prompt"));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_linked_shutdown_is_reported_destructive() {
        let report = Runner::new(fast_config())
            .run(MemorySessionStore::new())
            .await
            .unwrap();
        let locked = report
            .notices
            .iter()
            .find(|notice| notice.title == "Control locked")
            .expect("lock notice present");
        assert_eq!(locked.severity, Severity::Destructive);
    }
}
