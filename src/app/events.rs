//! Outbound application events.
//!
//! The [`PropController`](super::service::PropController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  The log
//! adapter renders them; tests record them.

use crate::arbiter::ActuatorPosition;
use crate::error::DriveError;
use crate::sequencer::StateId;

use super::commands::ControlCommand;

/// Which output a drive fault came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Stage1,
    Stage2,
    Actuator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller has started (carries the boot state).
    Started(StateId),

    /// The sequencer moved between states.
    StateChanged { from: StateId, to: StateId },

    /// A start press began counting the hold.
    HoldArmed { at_ms: u64 },

    /// Emergency power dropped in `Started`; this deployment does not regress.
    PowerLossIgnored,

    /// Manual override engaged or released.
    OverrideChanged {
        is_auto: bool,
        manual_position: ActuatorPosition,
    },

    /// The actuator was sent to a new position.
    ActuatorCommanded(ActuatorPosition),

    /// An output write failed.  The next tick retries.
    OutputFault { output: Output, error: DriveError },

    /// Periodic status line.
    Status(StatusSnapshot),

    /// A network command was executed.
    CommandHandled(ControlCommand),
}

/// Point-in-time view of the prop, for the periodic status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: StateId,
    pub stage1: bool,
    pub stage2: bool,
    pub is_auto: bool,
    pub actuator_energized: bool,
    pub actuator_position: Option<ActuatorPosition>,
    pub emergency_power: bool,
    pub float_switch: bool,
    pub start: bool,
}
