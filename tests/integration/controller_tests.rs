//! Integration tests for `PropController` using mock adapters.
//!
//! These tests drive the full tick path (inputs → sequencer → outputs →
//! actuator) and the command path, asserting only on what reaches the
//! output port and the event sink.

use propctl::app::commands::{ControlCommand, Reply, StatusToken};
use propctl::app::events::{AppEvent, Output};
use propctl::app::service::PropController;
use propctl::arbiter::ActuatorPosition;
use propctl::config::{PropConfig, RepulsePolicy};
use propctl::sequencer::StateId;

use crate::mock_hw::{MockHardware, OutputCall, RecordingSink};

const HOLD: u64 = 3000;

fn boot(config: &PropConfig) -> (PropController, MockHardware, RecordingSink) {
    let mut app = PropController::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink, 0);
    (app, hw, sink)
}

/// Walk a freshly booted controller through power, tank and the start
/// hold, ending in `Started` at `t0 + HOLD`.
fn arm_and_start(app: &mut PropController, hw: &mut MockHardware, sink: &mut RecordingSink, t0: u64) {
    hw.power_on();
    app.tick(hw, sink, t0);
    hw.fill_tank();
    app.tick(hw, sink, t0 + 20);
    hw.press_start();
    app.tick(hw, sink, t0 + 40);
    app.tick(hw, sink, t0 + 40 + HOLD);
    assert_eq!(app.state(), StateId::Started);
}

// ── End to end ────────────────────────────────────────────────

#[test]
fn full_sequence_opens_the_door() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));

    hw.power_on();
    app.tick(&mut hw, &mut sink, 20);
    assert_eq!(app.state(), StateId::WaitForFloatSwitch);
    assert!(hw.stage1());

    hw.fill_tank();
    app.tick(&mut hw, &mut sink, 40);
    assert_eq!(app.state(), StateId::WaitForStart);
    assert!(hw.stage2());

    hw.press_start();
    app.tick(&mut hw, &mut sink, 1000);
    assert_eq!(app.state(), StateId::WaitForStart);
    app.tick(&mut hw, &mut sink, 1000 + HOLD - 1);
    assert_eq!(app.state(), StateId::WaitForStart);
    app.tick(&mut hw, &mut sink, 1000 + HOLD);
    assert_eq!(app.state(), StateId::Started);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));

    assert_eq!(
        sink.states(),
        vec![StateId::WaitForFloatSwitch, StateId::WaitForStart, StateId::Started]
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::HoldArmed { at_ms: 1000 })), 1);
}

#[test]
fn releasing_start_early_restarts_the_hold() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    hw.power_on();
    app.tick(&mut hw, &mut sink, 0);
    hw.fill_tank();
    app.tick(&mut hw, &mut sink, 20);

    hw.press_start();
    app.tick(&mut hw, &mut sink, 100);
    hw.release_start();
    app.tick(&mut hw, &mut sink, 2000);
    hw.press_start();
    app.tick(&mut hw, &mut sink, 2500);
    app.tick(&mut hw, &mut sink, 100 + HOLD);
    assert_eq!(app.state(), StateId::WaitForStart);
    app.tick(&mut hw, &mut sink, 2500 + HOLD);
    assert_eq!(app.state(), StateId::Started);
}

#[test]
fn release_profile_drops_stage1_on_activation() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    arm_and_start(&mut app, &mut hw, &mut sink, 0);
    assert!(!hw.stage1());
    assert!(hw.stage2());
}

#[test]
fn keep_profile_holds_stage1_after_activation() {
    let config = PropConfig { setup_mode: false, ..PropConfig::sliding_door() };
    let (mut app, mut hw, mut sink) = boot(&config);
    arm_and_start(&mut app, &mut hw, &mut sink, 0);
    assert!(hw.stage1());
    assert!(hw.stage2());
}

// ── Manual override ───────────────────────────────────────────

#[test]
fn manual_open_persists_until_auto() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    hw.power_on();
    app.tick(&mut hw, &mut sink, 0);
    hw.fill_tank();
    app.tick(&mut hw, &mut sink, 20);
    assert_eq!(app.state(), StateId::WaitForStart);

    assert_eq!(app.execute(ControlCommand::ActuatorOpen, &mut hw, &mut sink, 30), Reply::Ack);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));

    for t in (40..1000).step_by(20) {
        app.tick(&mut hw, &mut sink, t);
        assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));
    }

    app.execute(ControlCommand::ActuatorAuto, &mut hw, &mut sink, 1000);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));
    app.tick(&mut hw, &mut sink, 1020);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));
    assert!(app.arbiter().is_auto());
}

#[test]
fn manual_close_holds_a_started_prop_shut() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    arm_and_start(&mut app, &mut hw, &mut sink, 0);

    app.execute(ControlCommand::ActuatorClose, &mut hw, &mut sink, 5000);
    app.tick(&mut hw, &mut sink, 5020);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));
    assert_eq!(app.state(), StateId::Started);

    app.execute(ControlCommand::ActuatorAuto, &mut hw, &mut sink, 5040);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));
}

#[test]
fn override_changes_are_reported() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    app.execute(ControlCommand::ActuatorOpen, &mut hw, &mut sink, 0);
    app.execute(ControlCommand::ActuatorAuto, &mut hw, &mut sink, 0);
    // A second auto is not a change.
    app.execute(ControlCommand::ActuatorAuto, &mut hw, &mut sink, 0);

    let changes: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::OverrideChanged { is_auto, manual_position } => Some((*is_auto, *manual_position)),
            _ => None,
        })
        .collect();
    assert_eq!(changes, vec![(false, ActuatorPosition::Open), (true, ActuatorPosition::Open)]);
}

// ── Power loss ────────────────────────────────────────────────

#[test]
fn power_loss_from_started_forces_closed() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    arm_and_start(&mut app, &mut hw, &mut sink, 0);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));

    hw.power_off();
    app.tick(&mut hw, &mut sink, 4000);
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));
    assert!(!hw.stage1());
    assert!(!hw.stage2());
}

#[test]
fn power_loss_is_ignored_without_regression() {
    let config = PropConfig { setup_mode: false, ..PropConfig::sliding_door() };
    let (mut app, mut hw, mut sink) = boot(&config);
    arm_and_start(&mut app, &mut hw, &mut sink, 0);

    hw.power_off();
    app.tick(&mut hw, &mut sink, 4000);
    assert_eq!(app.state(), StateId::Started);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));
    assert_eq!(sink.count(|e| *e == AppEvent::PowerLossIgnored), 1);
}

#[test]
fn latch_stays_open_until_power_loss() {
    let config = PropConfig {
        actuator: propctl::config::ActuatorKind::Latched,
        pulse_ms: 0,
        ..PropConfig::linear_actuator()
    };
    let (mut app, mut hw, mut sink) = boot(&config);
    arm_and_start(&mut app, &mut hw, &mut sink, 0);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));

    hw.release_start();
    app.tick(&mut hw, &mut sink, 5000);
    assert_eq!(app.commanded_position(), ActuatorPosition::Open);

    hw.power_off();
    app.tick(&mut hw, &mut sink, 5020);
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));
}

// ── Repulse policy ────────────────────────────────────────────

#[test]
fn every_tick_reasserts_position() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    for t in 1..=10 {
        app.tick(&mut hw, &mut sink, t * 20);
    }
    // One drive at start, one per tick.
    assert_eq!(hw.actuator_drives(), 11);
}

#[test]
fn on_change_drives_once_per_position() {
    let config = PropConfig { repulse: RepulsePolicy::OnChange, ..PropConfig::override_door() };
    let (mut app, mut hw, mut sink) = boot(&config);
    for t in 1..=10 {
        app.tick(&mut hw, &mut sink, t * 20);
    }
    assert_eq!(hw.actuator_drives(), 1);

    app.execute(ControlCommand::ActuatorOpen, &mut hw, &mut sink, 300);
    for t in 16..=20 {
        app.tick(&mut hw, &mut sink, t * 20);
    }
    assert_eq!(hw.actuator_drives(), 2);
}

#[test]
fn failed_drive_is_reported_and_retried() {
    let config = PropConfig { repulse: RepulsePolicy::OnChange, ..PropConfig::override_door() };
    let (mut app, mut hw, mut sink) = boot(&config);
    hw.fail_actuator = true;
    app.execute(ControlCommand::ActuatorOpen, &mut hw, &mut sink, 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::OutputFault { output: Output::Actuator, .. })),
        1
    );

    hw.fail_actuator = false;
    app.tick(&mut hw, &mut sink, 20);
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Open));
}

// ── Status queries ────────────────────────────────────────────

fn query(app: &mut PropController, hw: &mut MockHardware, cmd: ControlCommand) -> Reply {
    app.execute(cmd, hw, &mut RecordingSink::new(), 0)
}

#[test]
fn status_queries_report_contacts_and_activation() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    let open = Reply::Status(StatusToken::Open);
    let closed = Reply::Status(StatusToken::Closed);

    assert_eq!(query(&mut app, &mut hw, ControlCommand::EmergencyPowerStatus), open);
    assert_eq!(query(&mut app, &mut hw, ControlCommand::TankStatus), open);
    assert_eq!(query(&mut app, &mut hw, ControlCommand::StartStatus), closed);

    arm_and_start(&mut app, &mut hw, &mut sink, 0);
    assert_eq!(query(&mut app, &mut hw, ControlCommand::EmergencyPowerStatus), closed);
    assert_eq!(query(&mut app, &mut hw, ControlCommand::TankStatus), closed);
    assert_eq!(query(&mut app, &mut hw, ControlCommand::StartStatus), open);
}

#[test]
fn status_queries_do_not_touch_outputs() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    let before = hw.calls.len();
    app.execute(ControlCommand::EmergencyPowerStatus, &mut hw, &mut sink, 0);
    app.execute(ControlCommand::TankStatus, &mut hw, &mut sink, 0);
    app.execute(ControlCommand::StartStatus, &mut hw, &mut sink, 0);
    assert_eq!(hw.calls.len(), before);
}

// ── Setup and game resets ─────────────────────────────────────

#[test]
fn setup_mirrors_contacts_onto_stages() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::sliding_door());
    assert_eq!(app.state(), StateId::Setup);

    hw.levels.emergency_power = true;
    app.tick(&mut hw, &mut sink, 20);
    assert!(hw.stage1());
    assert!(!hw.stage2());

    hw.levels.emergency_power = false;
    hw.levels.float_switch = true;
    app.tick(&mut hw, &mut sink, 40);
    assert!(!hw.stage1());
    assert!(hw.stage2());
}

#[test]
fn setup_arms_on_start_level() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::sliding_door());
    hw.levels.float_switch = true;
    app.tick(&mut hw, &mut sink, 20);
    hw.press_start();
    app.tick(&mut hw, &mut sink, 40);
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);
    assert!(!hw.stage1());
    assert!(!hw.stage2());
}

#[test]
fn game_start_resets_and_clears_override() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::sliding_door());
    hw.press_start();
    app.tick(&mut hw, &mut sink, 20);
    hw.release_start();
    arm_and_start(&mut app, &mut hw, &mut sink, 100);
    app.execute(ControlCommand::ActuatorClose, &mut hw, &mut sink, 5000);
    assert!(!app.arbiter().is_auto());

    assert_eq!(app.execute(ControlCommand::GameStart, &mut hw, &mut sink, 5020), Reply::Ack);
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);
    assert!(app.arbiter().is_auto());
    assert_eq!(hw.actuator(), Some(ActuatorPosition::Closed));
    assert!(!hw.stage1());
    assert!(!hw.stage2());
}

#[test]
fn game_setup_returns_to_setup() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::sliding_door());
    hw.press_start();
    app.tick(&mut hw, &mut sink, 20);
    hw.release_start();
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);

    app.execute(ControlCommand::GameSetup, &mut hw, &mut sink, 40);
    assert_eq!(app.state(), StateId::Setup);
    assert_eq!(sink.states().last(), Some(&StateId::Setup));

    // Leaving Setup again releases the stage mirror.
    hw.levels.emergency_power = true;
    app.tick(&mut hw, &mut sink, 60);
    assert!(hw.stage1());
    hw.press_start();
    app.tick(&mut hw, &mut sink, 80);
    assert_eq!(app.state(), StateId::WaitForEmergencyPower);
    assert!(!hw.stage1());
}

#[test]
fn command_handling_is_logged() {
    let (mut app, mut hw, mut sink) = boot(&PropConfig::override_door());
    app.execute(ControlCommand::TankStatus, &mut hw, &mut sink, 0);
    assert_eq!(sink.events.last(), Some(&AppEvent::CommandHandled(ControlCommand::TankStatus)));
    assert!(hw.calls.contains(&OutputCall::Actuator(ActuatorPosition::Closed)));
}
