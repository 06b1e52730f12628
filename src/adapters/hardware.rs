//! Hardware adapter — bridges the prop's pins to the domain port traits.
//!
//! Owns the three debounced contact inputs, the two stage relays and the
//! configured actuator drive, exposing them through [`SignalPort`] and
//! [`OutputPort`].  Generic over `embedded-hal` pins: on target these are
//! ESP-IDF `PinDriver`s, in tests they are in-memory fakes.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{OutputPort, SignalPort};
use crate::arbiter::ActuatorPosition;
use crate::drivers::actuator::ActuatorDrive;
use crate::drivers::input::DebouncedInput;
use crate::drivers::relay::RelayOutput;
use crate::error::DriveError;
use crate::sequencer::{SensorEdges, SensorLevels};

pub struct Inputs<I> {
    pub emergency_power: DebouncedInput<I>,
    pub float_switch: DebouncedInput<I>,
    pub start: DebouncedInput<I>,
}

pub struct HardwareAdapter<I, O> {
    inputs: Inputs<I>,
    stage1: RelayOutput<O>,
    stage2: RelayOutput<O>,
    actuator: Box<dyn ActuatorDrive>,
}

impl<I: InputPin, O: OutputPin> HardwareAdapter<I, O> {
    pub fn new(
        inputs: Inputs<I>,
        stage1: RelayOutput<O>,
        stage2: RelayOutput<O>,
        actuator: Box<dyn ActuatorDrive>,
    ) -> Self {
        Self {
            inputs,
            stage1,
            stage2,
            actuator,
        }
    }

    pub fn actuator(&self) -> &dyn ActuatorDrive {
        self.actuator.as_ref()
    }
}

fn poll_input<I: InputPin>(input: &mut DebouncedInput<I>, now_ms: u64) {
    if input.poll(now_ms).is_err() {
        warn!("HW: read of {} failed, keeping last level", input.name());
    }
}

// ── SignalPort implementation ─────────────────────────────────

impl<I: InputPin, O: OutputPin> SignalPort for HardwareAdapter<I, O> {
    fn poll(&mut self, now_ms: u64) {
        poll_input(&mut self.inputs.emergency_power, now_ms);
        poll_input(&mut self.inputs.float_switch, now_ms);
        poll_input(&mut self.inputs.start, now_ms);
    }

    fn take_edges(&mut self) -> SensorEdges {
        let Inputs { emergency_power, float_switch, start } = &mut self.inputs;

        // Release edges of the float and start inputs carry no meaning;
        // drain them so they never go stale.
        let _ = float_switch.check_high_and_clear();
        let _ = start.check_high_and_clear();

        SensorEdges {
            emergency_power_activated: emergency_power.check_low_and_clear(),
            emergency_power_deactivated: emergency_power.check_high_and_clear(),
            tank_filled: float_switch.check_low_and_clear(),
            start_pressed: start.check_low_and_clear(),
        }
    }

    fn levels(&self) -> SensorLevels {
        SensorLevels {
            emergency_power: self.inputs.emergency_power.is_asserted(),
            float_switch: self.inputs.float_switch.is_asserted(),
            start: self.inputs.start.is_asserted(),
        }
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl<I: InputPin, O: OutputPin> OutputPort for HardwareAdapter<I, O> {
    fn set_stage1(&mut self, on: bool) -> Result<(), DriveError> {
        self.stage1.set(on)
    }

    fn set_stage2(&mut self, on: bool) -> Result<(), DriveError> {
        self.stage2.set(on)
    }

    fn command_actuator(&mut self, position: ActuatorPosition, now_ms: u64) -> Result<(), DriveError> {
        self.actuator.command_position(position, now_ms)
    }

    fn service_actuator(&mut self, now_ms: u64) -> Result<(), DriveError> {
        self.actuator.service(now_ms)
    }

    fn actuator_energized(&self) -> bool {
        self.actuator.energized()
    }
}
