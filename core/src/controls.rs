use crate::prelude::SonarPhase;
use serde::{Deserialize, Serialize};

/// Whether an actuator follows the sonar or toggles independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    Standard,
    SonarLinked,
}

/// One relay/actuator row on the control panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorControl {
    pub id: u8,
    pub name: String,
    pub kind: ControlKind,
    pub is_active: bool,
}

impl ActuatorControl {
    fn new(id: u8, name: &str, kind: ControlKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            is_active: false,
        }
    }

    pub fn is_sonar_linked(&self) -> bool {
        self.kind == ControlKind::SonarLinked
    }
}

/// A linked control flipped by a settled sonar phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcedChange {
    pub id: u8,
    pub name: String,
    pub is_active: bool,
}

/// Result of a toggle request that was not refused outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The switch flipped; carries what a status notice needs.
    Applied {
        id: u8,
        name: String,
        is_active: bool,
    },
    /// Shutting down a sonar-linked actuator needs operator confirmation.
    ConfirmationRequired { id: u8, name: String },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    #[error("no control with id {0}")]
    UnknownControl(u8),
    #[error("{name} cannot be switched off while the sonar is active")]
    LockedBySonar { name: String },
}

/// The actuator rows shown on the control panel.
///
/// A fresh panel always starts from the fixed default set with everything
/// off; nothing about the rows outlives the panel.
pub struct ControlPanel {
    controls: Vec<ActuatorControl>,
}

impl ControlPanel {
    pub fn defaults() -> Self {
        Self {
            controls: vec![
                ActuatorControl::new(1, "Main Relay", ControlKind::Standard),
                ActuatorControl::new(2, "Pump Motor", ControlKind::Standard),
                ActuatorControl::new(3, "LED Strip", ControlKind::Standard),
                ActuatorControl::new(4, "Cooling Fan", ControlKind::SonarLinked),
                ActuatorControl::new(5, "Transducer", ControlKind::SonarLinked),
            ],
        }
    }

    pub fn controls(&self) -> &[ActuatorControl] {
        &self.controls
    }

    pub fn get(&self, id: u8) -> Option<&ActuatorControl> {
        self.controls.iter().find(|control| control.id == id)
    }

    /// Requests the flip of one control under the current sonar phase.
    ///
    /// Linked controls refuse to shut down while the sonar is active, and
    /// otherwise hold for confirmation; everything else applies at once.
    pub fn toggle(
        &mut self,
        id: u8,
        sonar: SonarPhase,
    ) -> Result<ToggleOutcome, ToggleError> {
        let control = self.find_mut(id)?;
        let target = !control.is_active;
        if control.is_sonar_linked() && !target {
            if sonar == SonarPhase::Active {
                return Err(ToggleError::LockedBySonar {
                    name: control.name.clone(),
                });
            }
            return Ok(ToggleOutcome::ConfirmationRequired {
                id,
                name: control.name.clone(),
            });
        }
        control.is_active = target;
        Ok(ToggleOutcome::Applied {
            id,
            name: control.name.clone(),
            is_active: target,
        })
    }

    /// Applies a linked shutdown the operator already confirmed. The sonar
    /// lock is re-checked: the phase may have changed while the prompt was
    /// open.
    pub fn confirm_toggle(
        &mut self,
        id: u8,
        sonar: SonarPhase,
    ) -> Result<ToggleOutcome, ToggleError> {
        let control = self.find_mut(id)?;
        let target = !control.is_active;
        if control.is_sonar_linked() && !target && sonar == SonarPhase::Active {
            return Err(ToggleError::LockedBySonar {
                name: control.name.clone(),
            });
        }
        control.is_active = target;
        Ok(ToggleOutcome::Applied {
            id,
            name: control.name.clone(),
            is_active: target,
        })
    }

    /// Mirrors the linked controls to a settled sonar phase. Transitional
    /// phases leave every row untouched.
    pub fn apply_sonar_phase(&mut self, sonar: SonarPhase) -> Vec<ForcedChange> {
        let forced = match sonar {
            SonarPhase::Active => true,
            SonarPhase::Standby => false,
            SonarPhase::Initializing | SonarPhase::Deactivating => return Vec::new(),
        };
        self.controls
            .iter_mut()
            .filter(|control| control.is_sonar_linked() && control.is_active != forced)
            .map(|control| {
                control.is_active = forced;
                ForcedChange {
                    id: control.id,
                    name: control.name.clone(),
                    is_active: forced,
                }
            })
            .collect()
    }

    fn find_mut(&mut self, id: u8) -> Result<&mut ActuatorControl, ToggleError> {
        self.controls
            .iter_mut()
            .find(|control| control.id == id)
            .ok_or(ToggleError::UnknownControl(id))
    }
}
