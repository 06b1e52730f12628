//! Mock hardware adapter for integration tests.
//!
//! Records every output call so tests can assert on the full command
//! history, and lets tests inject contact edges and levels directly.

use propctl::app::events::AppEvent;
use propctl::app::ports::{EventSink, OutputPort, SignalPort};
use propctl::arbiter::ActuatorPosition;
use propctl::error::DriveError;
use propctl::sequencer::{SensorEdges, SensorLevels, StateId};

// ── Output call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCall {
    Stage1(bool),
    Stage2(bool),
    Actuator(ActuatorPosition),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<OutputCall>,
    pub levels: SensorLevels,
    pending: SensorEdges,
    pub fail_actuator: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn power_on(&mut self) {
        self.levels.emergency_power = true;
        self.pending.emergency_power_activated = true;
    }

    pub fn power_off(&mut self) {
        self.levels.emergency_power = false;
        self.pending.emergency_power_deactivated = true;
    }

    pub fn fill_tank(&mut self) {
        self.levels.float_switch = true;
        self.pending.tank_filled = true;
    }

    pub fn press_start(&mut self) {
        self.levels.start = true;
        self.pending.start_pressed = true;
    }

    pub fn release_start(&mut self) {
        self.levels.start = false;
    }

    pub fn stage1(&self) -> bool {
        self.last(|c| match c {
            OutputCall::Stage1(on) => Some(on),
            _ => None,
        })
        .unwrap_or(false)
    }

    pub fn stage2(&self) -> bool {
        self.last(|c| match c {
            OutputCall::Stage2(on) => Some(on),
            _ => None,
        })
        .unwrap_or(false)
    }

    pub fn actuator(&self) -> Option<ActuatorPosition> {
        self.last(|c| match c {
            OutputCall::Actuator(p) => Some(p),
            _ => None,
        })
    }

    pub fn actuator_drives(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, OutputCall::Actuator(_)))
            .count()
    }

    fn last<T>(&self, f: impl Fn(OutputCall) -> Option<T>) -> Option<T> {
        self.calls.iter().rev().find_map(|c| f(*c))
    }
}

impl SignalPort for MockHardware {
    fn poll(&mut self, _now_ms: u64) {}

    fn take_edges(&mut self) -> SensorEdges {
        core::mem::take(&mut self.pending)
    }

    fn levels(&self) -> SensorLevels {
        self.levels
    }
}

impl OutputPort for MockHardware {
    fn set_stage1(&mut self, on: bool) -> Result<(), DriveError> {
        self.calls.push(OutputCall::Stage1(on));
        Ok(())
    }

    fn set_stage2(&mut self, on: bool) -> Result<(), DriveError> {
        self.calls.push(OutputCall::Stage2(on));
        Ok(())
    }

    fn command_actuator(&mut self, position: ActuatorPosition, _now_ms: u64) -> Result<(), DriveError> {
        if self.fail_actuator {
            return Err(DriveError::PinWrite("mock-actuator"));
        }
        self.calls.push(OutputCall::Actuator(position));
        Ok(())
    }

    fn service_actuator(&mut self, _now_ms: u64) -> Result<(), DriveError> {
        Ok(())
    }

    fn actuator_energized(&self) -> bool {
        self.actuator() == Some(ActuatorPosition::Closed)
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every state entered, in order.
    pub fn states(&self) -> Vec<StateId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
