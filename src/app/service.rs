//! Prop controller — the hexagonal core.
//!
//! [`PropController`] owns the sequencer and the actuator arbiter.  It is
//! the single owner of all mutable prop state: the control loop calls
//! [`tick`](PropController::tick) at a fixed period and
//! [`execute`](PropController::execute) for each network command in
//! between, so a command's effect is fully visible to the next tick.
//!
//! ```text
//!  SignalPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │      PropController      │
//!  OutputPort ◀── │  Sequencer · Arbiter     │
//!                 └──────────────────────────┘
//! ```

use log::info;

use crate::arbiter::{ActuatorPosition, Arbiter};
use crate::config::PropConfig;
use crate::sequencer::{
    SensorLevels, Sequencer, SequencerOptions, SideEffect, StateId, TickOutcome,
};

use super::commands::{ControlCommand, Reply, StatusToken};
use super::events::{AppEvent, Output, StatusSnapshot};
use super::ports::{EventSink, OutputPort, SignalPort};

pub struct PropController {
    seq: Sequencer,
    arbiter: Arbiter,
    hold_duration_ms: u64,
    initial: StateId,
}

impl PropController {
    /// Does **not** run the initial state's entry actions; call
    /// [`start`](Self::start) next.
    pub fn new(config: &PropConfig) -> Self {
        let initial = if config.setup_mode {
            StateId::Setup
        } else {
            StateId::WaitForEmergencyPower
        };
        Self {
            seq: Sequencer::new(SequencerOptions::from(config), initial),
            arbiter: Arbiter::from_config(config),
            hold_duration_ms: u64::from(config.start_hold_ms),
            initial,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, hw: &mut impl OutputPort, sink: &mut impl EventSink, now_ms: u64) {
        let outcome = self.seq.start();
        self.apply_outcome(&outcome, hw, sink);
        self.drive_actuator(hw, sink, now_ms);
        sink.emit(&AppEvent::Started(self.seq.state()));
        info!("Prop controller started in {}", self.seq.state_name());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One control cycle: inputs → sequencer → outputs → actuator.
    pub fn tick(
        &mut self,
        hw: &mut (impl SignalPort + OutputPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        hw.poll(now_ms);
        let edges = hw.take_edges();
        let levels = hw.levels();

        let outcome = self.seq.tick(edges, levels, now_ms, self.hold_duration_ms);
        self.apply_outcome(&outcome, hw, sink);
        self.drive_actuator(hw, sink, now_ms);

        if let Err(error) = hw.service_actuator(now_ms) {
            sink.emit(&AppEvent::OutputFault { output: Output::Actuator, error });
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Execute a network command synchronously.
    pub fn execute(
        &mut self,
        cmd: ControlCommand,
        hw: &mut (impl SignalPort + OutputPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) -> Reply {
        let levels = hw.levels();
        let reply = match cmd {
            ControlCommand::EmergencyPowerStatus => {
                Reply::Status(StatusToken::contact(levels.emergency_power))
            }
            ControlCommand::TankStatus => Reply::Status(StatusToken::contact(levels.float_switch)),
            ControlCommand::StartStatus => Reply::Status(if self.seq.is_activated() {
                StatusToken::Open
            } else {
                StatusToken::Closed
            }),
            ControlCommand::ActuatorOpen => {
                self.set_manual(ActuatorPosition::Open, hw, sink, now_ms);
                Reply::Ack
            }
            ControlCommand::ActuatorClose => {
                self.set_manual(ActuatorPosition::Closed, hw, sink, now_ms);
                Reply::Ack
            }
            ControlCommand::ActuatorAuto => {
                if !self.arbiter.is_auto() {
                    self.arbiter.set_auto();
                    self.emit_override(sink);
                }
                self.drive_actuator(hw, sink, now_ms);
                Reply::Ack
            }
            ControlCommand::GameStart => {
                self.reset_to(StateId::WaitForEmergencyPower, hw, sink, now_ms);
                Reply::Ack
            }
            ControlCommand::GameSetup => {
                self.reset_to(StateId::Setup, hw, sink, now_ms);
                Reply::Ack
            }
        };
        sink.emit(&AppEvent::CommandHandled(cmd));
        reply
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.seq.state()
    }

    pub fn initial_state(&self) -> StateId {
        self.initial
    }

    pub fn stage1(&self) -> bool {
        self.seq.stage1()
    }

    pub fn stage2(&self) -> bool {
        self.seq.stage2()
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn commanded_position(&self) -> ActuatorPosition {
        self.arbiter.commanded(self.seq.state())
    }

    pub fn build_status(&self, hw: &(impl SignalPort + OutputPort)) -> StatusSnapshot {
        let SensorLevels { emergency_power, float_switch, start } = hw.levels();
        StatusSnapshot {
            state: self.seq.state(),
            stage1: self.seq.stage1(),
            stage2: self.seq.stage2(),
            is_auto: self.arbiter.is_auto(),
            actuator_energized: hw.actuator_energized(),
            actuator_position: self.arbiter.last_driven(),
            emergency_power,
            float_switch,
            start,
        }
    }

    // ── Internal ──────────────────────────────────────────────

    fn set_manual(
        &mut self,
        position: ActuatorPosition,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        let position = self.arbiter.set_manual(position);
        self.emit_override(sink);
        self.command(position, hw, sink, now_ms);
    }

    fn reset_to(
        &mut self,
        target: StateId,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        let outcome = self.seq.reset_to(target);
        self.apply_outcome(&outcome, hw, sink);
        self.drive_actuator(hw, sink, now_ms);
    }

    fn apply_outcome(
        &mut self,
        outcome: &TickOutcome,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) {
        for effect in &outcome.effects {
            match *effect {
                SideEffect::Stage1(on) => {
                    if let Err(error) = hw.set_stage1(on) {
                        sink.emit(&AppEvent::OutputFault { output: Output::Stage1, error });
                    }
                }
                SideEffect::Stage2(on) => {
                    if let Err(error) = hw.set_stage2(on) {
                        sink.emit(&AppEvent::OutputFault { output: Output::Stage2, error });
                    }
                }
                SideEffect::HoldArmed { at_ms } => sink.emit(&AppEvent::HoldArmed { at_ms }),
                SideEffect::PowerLossIgnored => sink.emit(&AppEvent::PowerLossIgnored),
                SideEffect::Activate | SideEffect::Deactivate | SideEffect::ReleaseOverride => {
                    if self.arbiter.apply_effect(effect) {
                        self.emit_override(sink);
                    }
                }
            }
        }

        if let Some((from, to)) = outcome.transition {
            sink.emit(&AppEvent::StateChanged { from, to });
        }
    }

    /// Re-assert the arbitrated position, subject to the repulse policy.
    fn drive_actuator(&mut self, hw: &mut impl OutputPort, sink: &mut impl EventSink, now_ms: u64) {
        if let Some(position) = self.arbiter.next_drive(self.seq.state()) {
            self.command(position, hw, sink, now_ms);
        }
    }

    fn command(
        &mut self,
        position: ActuatorPosition,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        match hw.command_actuator(position, now_ms) {
            Ok(()) => {
                if self.arbiter.last_driven() != Some(position) {
                    sink.emit(&AppEvent::ActuatorCommanded(position));
                }
                self.arbiter.mark_driven(position);
            }
            Err(error) => sink.emit(&AppEvent::OutputFault { output: Output::Actuator, error }),
        }
    }

    fn emit_override(&self, sink: &mut impl EventSink) {
        let ov = self.arbiter.override_state();
        sink.emit(&AppEvent::OverrideChanged {
            is_auto: ov.is_auto,
            manual_position: ov.manual_position,
        });
    }
}
