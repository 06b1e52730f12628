//! Inbound commands to the prop controller.
//!
//! The HTTP route table maps each recognised path to one of these; the
//! [`PropController`](super::service::PropController) executes it between
//! ticks and answers with a [`Reply`].

/// Commands the control protocol can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Emergency-power contact state.
    EmergencyPowerStatus,
    /// Float-switch contact state.
    TankStatus,
    /// Whether the prop has started.
    StartStatus,
    /// Latch the actuator open (manual override).
    ActuatorOpen,
    /// Latch the actuator closed (manual override).
    ActuatorClose,
    /// Return the actuator to automatic control.
    ActuatorAuto,
    /// Reset the game to WaitForEmergencyPower.
    GameStart,
    /// Reset the game to Setup.
    GameSetup,
}

impl ControlCommand {
    pub fn is_status_query(self) -> bool {
        matches!(
            self,
            Self::EmergencyPowerStatus | Self::TankStatus | Self::StartStatus
        )
    }
}

/// One of the two fixed status tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusToken {
    Open,
    Closed,
}

impl StatusToken {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    /// `Closed` for an asserted (closed) contact.
    pub fn contact(asserted: bool) -> Self {
        if asserted { Self::Closed } else { Self::Open }
    }
}

/// Result of executing a [`ControlCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Command applied; no body.
    Ack,
    Status(StatusToken),
}
