//! Actuator drive shapes behind one capability trait.
//!
//! | Shape       | Open                        | Closed                      |
//! |-------------|-----------------------------|-----------------------------|
//! | `Maglock`   | coil de-energised           | coil energised              |
//! | `Latched`   | relay on                    | relay off                   |
//! | `Bistable`  | `pulse_ms` on the open line | `pulse_ms` on the close line|
//!
//! Maglock and latched drives are level outputs, so re-commanding the
//! same position simply rewrites the pin.  The bistable drive is
//! fire-and-forget: a command for the position it already moved (or is
//! moving) to is a no-op, and [`ActuatorDrive::service`] ends the pulse.

use embedded_hal::digital::OutputPin;

use crate::arbiter::ActuatorPosition;
use crate::config::ActuatorKind;
use crate::drivers::relay::RelayOutput;
use crate::error::DriveError;

pub trait ActuatorDrive {
    fn kind(&self) -> ActuatorKind;

    /// Move towards `position`.  Called every tick or only on change,
    /// depending on the repulse policy.
    fn command_position(
        &mut self,
        position: ActuatorPosition,
        now_ms: u64,
    ) -> Result<(), DriveError>;

    /// Housekeeping at tick rate (pulse timeouts).
    fn service(&mut self, _now_ms: u64) -> Result<(), DriveError> {
        Ok(())
    }

    /// Last position successfully commanded, if any.
    fn position(&self) -> Option<ActuatorPosition>;

    /// Any coil currently energised.
    fn energized(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Maglock
// ---------------------------------------------------------------------------

pub struct MaglockDrive<P> {
    coil: RelayOutput<P>,
    position: Option<ActuatorPosition>,
}

impl<P: OutputPin> MaglockDrive<P> {
    pub fn new(coil: RelayOutput<P>) -> Self {
        Self {
            coil,
            position: None,
        }
    }
}

impl<P: OutputPin> ActuatorDrive for MaglockDrive<P> {
    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Maglock
    }

    fn command_position(&mut self, position: ActuatorPosition, _now_ms: u64) -> Result<(), DriveError> {
        self.coil.set(position == ActuatorPosition::Closed)?;
        self.position = Some(position);
        Ok(())
    }

    fn position(&self) -> Option<ActuatorPosition> {
        self.position
    }

    fn energized(&self) -> bool {
        self.coil.is_on()
    }
}

// ---------------------------------------------------------------------------
// Latched relay
// ---------------------------------------------------------------------------

pub struct LatchedDrive<P> {
    relay: RelayOutput<P>,
    position: Option<ActuatorPosition>,
}

impl<P: OutputPin> LatchedDrive<P> {
    pub fn new(relay: RelayOutput<P>) -> Self {
        Self {
            relay,
            position: None,
        }
    }
}

impl<P: OutputPin> ActuatorDrive for LatchedDrive<P> {
    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Latched
    }

    fn command_position(&mut self, position: ActuatorPosition, _now_ms: u64) -> Result<(), DriveError> {
        self.relay.set(position == ActuatorPosition::Open)?;
        self.position = Some(position);
        Ok(())
    }

    fn position(&self) -> Option<ActuatorPosition> {
        self.position
    }

    fn energized(&self) -> bool {
        self.relay.is_on()
    }
}

// ---------------------------------------------------------------------------
// Bistable (two direction lines)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseDirection {
    Neutral,
    Open,
    Close,
}

pub struct BistableDrive<O, C> {
    open_line: RelayOutput<O>,
    close_line: RelayOutput<C>,
    pulse_ms: u64,
    target: Option<ActuatorPosition>,
    pulse: PulseDirection,
    pulse_end_ms: u64,
}

impl<O: OutputPin, C: OutputPin> BistableDrive<O, C> {
    pub fn new(open_line: RelayOutput<O>, close_line: RelayOutput<C>, pulse_ms: u32) -> Self {
        Self {
            open_line,
            close_line,
            pulse_ms: u64::from(pulse_ms),
            target: None,
            pulse: PulseDirection::Neutral,
            pulse_end_ms: 0,
        }
    }

    pub fn pulse(&self) -> PulseDirection {
        self.pulse
    }

    fn set_pulse(&mut self, dir: PulseDirection) -> Result<(), DriveError> {
        // Both lines drop before either rises.
        self.open_line.set(false)?;
        self.close_line.set(false)?;
        match dir {
            PulseDirection::Neutral => {}
            PulseDirection::Open => self.open_line.set(true)?,
            PulseDirection::Close => self.close_line.set(true)?,
        }
        self.pulse = dir;
        Ok(())
    }
}

impl<O: OutputPin, C: OutputPin> ActuatorDrive for BistableDrive<O, C> {
    fn kind(&self) -> ActuatorKind {
        ActuatorKind::Bistable
    }

    fn command_position(&mut self, position: ActuatorPosition, now_ms: u64) -> Result<(), DriveError> {
        if self.target == Some(position) {
            return Ok(());
        }
        let dir = match position {
            ActuatorPosition::Open => PulseDirection::Open,
            ActuatorPosition::Closed => PulseDirection::Close,
        };
        self.set_pulse(dir)?;
        self.target = Some(position);
        self.pulse_end_ms = now_ms.saturating_add(self.pulse_ms);
        Ok(())
    }

    fn service(&mut self, now_ms: u64) -> Result<(), DriveError> {
        if self.pulse != PulseDirection::Neutral && now_ms >= self.pulse_end_ms {
            self.set_pulse(PulseDirection::Neutral)?;
        }
        Ok(())
    }

    fn position(&self) -> Option<ActuatorPosition> {
        self.target
    }

    fn energized(&self) -> bool {
        self.pulse != PulseDirection::Neutral
    }
}
