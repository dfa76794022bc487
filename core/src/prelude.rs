use serde::{Deserialize, Serialize};

/// Operational phase of the sonar subsystem.
///
/// The cycle is strictly linear: `Standby → Initializing → Active →
/// Deactivating → Standby`. The transitional phases exist so a request
/// arriving mid-transition can be rejected instead of overlapping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SonarPhase {
    Standby,
    Initializing,
    Active,
    Deactivating,
}

impl SonarPhase {
    /// True while a timed transition is in flight.
    pub fn is_transitional(self) -> bool {
        matches!(self, SonarPhase::Initializing | SonarPhase::Deactivating)
    }

    /// Operator-facing status label.
    pub fn label(self) -> &'static str {
        match self {
            SonarPhase::Standby => "Standby",
            SonarPhase::Initializing => "Initializing...",
            SonarPhase::Active => "Active",
            SonarPhase::Deactivating => "Deactivating...",
        }
    }
}

/// Published snapshot of the sonar subsystem.
///
/// Broadcast by the activation machine over a watch channel; the control
/// panel and the front ends subscribe instead of polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SonarStatus {
    pub phase: SonarPhase,
    /// Session-scoped gate for the activation confirmation dialog.
    pub safety_warning_enabled: bool,
}

impl Default for SonarStatus {
    fn default() -> Self {
        Self {
            phase: SonarPhase::Standby,
            safety_warning_enabled: true,
        }
    }
}

pub use crate::activation::{ActivationMachine, TransitionRejected};
pub use crate::auth::{AuthError, Authenticator, Session, SessionStore};
pub use crate::controls::{ActuatorControl, ControlKind, ControlPanel, ToggleError, ToggleOutcome};
pub use crate::notify::{Notice, Notifier, Severity};
pub use crate::sweep::{SweepEngine, SweepTick};
pub use crate::tracker::{DetectionPoint, PointTracker};
