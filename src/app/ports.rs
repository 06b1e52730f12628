//! Port traits — the hexagonal boundary between the prop logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PropController (domain)
//! ```
//!
//! The [`PropController`](super::service::PropController) consumes these
//! via generics, so the sequencer and arbiter never touch a pin.

use crate::arbiter::ActuatorPosition;
use crate::config::PropConfig;
use crate::error::{ConfigError, DriveError};
use crate::sequencer::{SensorEdges, SensorLevels};

// ───────────────────────────────────────────────────────────────
// Signal port (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The three contact inputs: emergency power, float switch, start.
pub trait SignalPort {
    /// Sample the inputs and advance their debounce.
    fn poll(&mut self, now_ms: u64);

    /// Consume every edge latched since the last call.  Each physical
    /// edge is reported exactly once.
    fn take_edges(&mut self) -> SensorEdges;

    /// Current debounced levels.
    fn levels(&self) -> SensorLevels;
}

// ───────────────────────────────────────────────────────────────
// Output port (domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait OutputPort {
    fn set_stage1(&mut self, on: bool) -> Result<(), DriveError>;

    fn set_stage2(&mut self, on: bool) -> Result<(), DriveError>;

    /// Hand a position to the configured actuator drive.
    fn command_actuator(
        &mut self,
        position: ActuatorPosition,
        now_ms: u64,
    ) -> Result<(), DriveError>;

    /// Per-tick actuator housekeeping (ends bistable pulses).
    fn service_actuator(&mut self, now_ms: u64) -> Result<(), DriveError>;

    /// Any actuator coil currently energised.
    fn actuator_energized(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Source of the deployment configuration.  Implementations validate
/// before returning.
pub trait ConfigPort {
    fn load(&self) -> Result<PropConfig, ConfigError>;
}
