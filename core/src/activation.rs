use crate::prelude::{SonarPhase, SonarStatus};
use log::{debug, info};
use std::time::Duration;
use tokio::sync::watch;

/// Simulated hardware latency for spin-up and spin-down.
pub const TRANSITION_LATENCY: Duration = Duration::from_millis(2000);

/// A transition request that arrived while the machine could not honor it.
///
/// Rejections are no-ops: the phase is left untouched and no second
/// transition is scheduled.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("sonar transition rejected while {current:?}")]
pub struct TransitionRejected {
    pub current: SonarPhase,
}

/// Owns the sonar phase and the session-scoped safety-warning flag.
///
/// The machine is the single writer of the published [`SonarStatus`];
/// everything else subscribes through [`subscribe`](Self::subscribe) or
/// calls the request operations. One instance is shared per console
/// session: construct it where the session starts and hand the
/// subscription to whatever needs to follow along.
pub struct ActivationMachine {
    status: watch::Sender<SonarStatus>,
    latency: Duration,
}

impl ActivationMachine {
    pub fn new(latency: Duration) -> Self {
        let (status, _) = watch::channel(SonarStatus::default());
        Self { status, latency }
    }

    pub fn status(&self) -> SonarStatus {
        *self.status.borrow()
    }

    pub fn phase(&self) -> SonarPhase {
        self.status.borrow().phase
    }

    pub fn subscribe(&self) -> watch::Receiver<SonarStatus> {
        self.status.subscribe()
    }

    pub fn safety_warning_enabled(&self) -> bool {
        self.status.borrow().safety_warning_enabled
    }

    /// True when an activation request must first clear the safety dialog.
    /// The dialog itself belongs to the front end; the machine only gates.
    pub fn needs_confirmation(&self) -> bool {
        let status = self.status.borrow();
        status.phase == SonarPhase::Standby && status.safety_warning_enabled
    }

    /// Session-scoped "don't ask again".
    pub fn disable_safety_warning(&self) {
        self.status
            .send_modify(|status| status.safety_warning_enabled = false);
    }

    /// Spin the sonar up: `Standby → Initializing → Active`, with the
    /// configured latency spent in `Initializing`. Rejected unless the
    /// machine is in `Standby`.
    pub async fn activate(&self) -> Result<(), TransitionRejected> {
        self.begin(SonarPhase::Standby, SonarPhase::Initializing)?;
        tokio::time::sleep(self.latency).await;
        self.settle(SonarPhase::Active);
        Ok(())
    }

    /// Spin the sonar down: `Active → Deactivating → Standby`. Linked
    /// actuators are left alone until the transition settles.
    pub async fn deactivate(&self) -> Result<(), TransitionRejected> {
        self.begin(SonarPhase::Active, SonarPhase::Deactivating)?;
        tokio::time::sleep(self.latency).await;
        self.settle(SonarPhase::Standby);
        Ok(())
    }

    fn begin(
        &self,
        expected: SonarPhase,
        next: SonarPhase,
    ) -> Result<(), TransitionRejected> {
        let mut rejected = None;
        self.status.send_if_modified(|status| {
            if status.phase == expected {
                status.phase = next;
                true
            } else {
                rejected = Some(TransitionRejected {
                    current: status.phase,
                });
                false
            }
        });
        match rejected {
            Some(err) => {
                debug!("sonar request ignored: {err}");
                Err(err)
            }
            None => {
                info!("sonar phase -> {next:?}");
                Ok(())
            }
        }
    }

    fn settle(&self, phase: SonarPhase) {
        self.status.send_modify(|status| status.phase = phase);
        info!("sonar phase -> {phase:?}");
    }
}

impl Default for ActivationMachine {
    fn default() -> Self {
        Self::new(TRANSITION_LATENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::advance;

    const LATENCY: Duration = Duration::from_millis(2000);

    #[tokio::test(start_paused = true)]
    async fn activation_settles_only_after_the_latency() {
        let machine = Arc::new(ActivationMachine::new(LATENCY));
        machine.disable_safety_warning();

        let task = tokio::spawn({
            let machine = machine.clone();
            async move { machine.activate().await }
        });
        tokio::task::yield_now().await;
        assert_eq!(machine.phase(), SonarPhase::Initializing);

        advance(Duration::from_millis(1999)).await;
        assert_eq!(machine.phase(), SonarPhase::Initializing);

        advance(Duration::from_millis(1)).await;
        task.await.unwrap().unwrap();
        assert_eq!(machine.phase(), SonarPhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn request_during_initializing_is_a_rejected_no_op() {
        let machine = Arc::new(ActivationMachine::new(LATENCY));

        let task = tokio::spawn({
            let machine = machine.clone();
            async move { machine.activate().await }
        });
        tokio::task::yield_now().await;

        let rejected = machine.activate().await.unwrap_err();
        assert_eq!(rejected.current, SonarPhase::Initializing);
        let rejected = machine.deactivate().await.unwrap_err();
        assert_eq!(rejected.current, SonarPhase::Initializing);

        // Exactly one transition was scheduled.
        advance(LATENCY).await;
        task.await.unwrap().unwrap();
        assert_eq!(machine.phase(), SonarPhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn full_cycle_returns_to_standby() {
        let machine = ActivationMachine::new(Duration::from_millis(10));
        machine.activate().await.unwrap();
        assert_eq!(machine.phase(), SonarPhase::Active);
        machine.deactivate().await.unwrap();
        assert_eq!(machine.phase(), SonarPhase::Standby);
    }

    #[tokio::test(start_paused = true)]
    async fn deactivate_from_standby_is_rejected() {
        let machine = ActivationMachine::new(LATENCY);
        let rejected = machine.deactivate().await.unwrap_err();
        assert_eq!(rejected.current, SonarPhase::Standby);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_both_transition_edges() {
        let machine = Arc::new(ActivationMachine::new(LATENCY));
        let mut status = machine.subscribe();

        let task = tokio::spawn({
            let machine = machine.clone();
            async move { machine.activate().await }
        });
        tokio::task::yield_now().await;
        assert!(status.has_changed().unwrap());
        assert_eq!(status.borrow_and_update().phase, SonarPhase::Initializing);

        advance(LATENCY).await;
        task.await.unwrap().unwrap();
        assert!(status.has_changed().unwrap());
        assert_eq!(status.borrow_and_update().phase, SonarPhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn safety_gate_clears_for_the_session() {
        let machine = ActivationMachine::new(LATENCY);
        assert!(machine.needs_confirmation());
        machine.disable_safety_warning();
        assert!(!machine.needs_confirmation());
        assert!(!machine.safety_warning_enabled());
    }
}
