//! Concrete state handler functions and table builder.
//!
//! ```text
//!  SETUP ──[start level]──▶ WAIT_POWER ──[power on]──▶ WAIT_FLOAT ──[tank full]──▶ WAIT_START
//!                               ▲                                                    │
//!                               │                                             [held ≥ hold]
//!                               │                                                    ▼
//!                               └─────────────────[power lost]*──────────────── STARTED
//!
//!  * from WAIT_FLOAT, WAIT_START and STARTED, only when regress_on_power_loss is set
//! ```

use super::context::{SequencerContext, SideEffect};
use super::{StateDescriptor, StateId};
use crate::config::Stage1AfterActivation;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Setup
        StateDescriptor {
            id: StateId::Setup,
            name: "Setup",
            on_enter: Some(setup_enter),
            on_exit: Some(setup_exit),
            on_update: setup_update,
        },
        // Index 1 — WaitForEmergencyPower
        StateDescriptor {
            id: StateId::WaitForEmergencyPower,
            name: "WaitForEmergencyPower",
            on_enter: Some(wait_power_enter),
            on_exit: None,
            on_update: wait_power_update,
        },
        // Index 2 — WaitForFloatSwitch
        StateDescriptor {
            id: StateId::WaitForFloatSwitch,
            name: "WaitForFloatSwitch",
            on_enter: Some(wait_float_enter),
            on_exit: None,
            on_update: wait_float_update,
        },
        // Index 3 — WaitForStart
        StateDescriptor {
            id: StateId::WaitForStart,
            name: "WaitForStart",
            on_enter: Some(wait_start_enter),
            on_exit: Some(wait_start_exit),
            on_update: wait_start_update,
        },
        // Index 4 — Started
        StateDescriptor {
            id: StateId::Started,
            name: "Started",
            on_enter: Some(started_enter),
            on_exit: Some(started_exit),
            on_update: started_update,
        },
    ]
}

/// Shared guard for every armed state.
fn power_lost(ctx: &SequencerContext) -> bool {
    ctx.options.regress_on_power_loss && ctx.edges.emergency_power_deactivated
}

// ═══════════════════════════════════════════════════════════════════════════
//  SETUP — wiring check before the game is armed
// ═══════════════════════════════════════════════════════════════════════════

fn setup_enter(ctx: &mut SequencerContext) {
    ctx.push(SideEffect::Deactivate);
}

fn setup_exit(ctx: &mut SequencerContext) {
    ctx.set_stage1(false);
    ctx.set_stage2(false);
    ctx.push(SideEffect::ReleaseOverride);
}

fn setup_update(ctx: &mut SequencerContext) -> Option<StateId> {
    // Level-triggered: a start input already held at boot arms the game.
    if ctx.levels.start {
        return Some(StateId::WaitForEmergencyPower);
    }

    // Mirror the inputs onto the stage outputs so the wiring can be checked.
    ctx.set_stage1(ctx.levels.emergency_power);
    ctx.set_stage2(ctx.levels.float_switch);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAIT_POWER
// ═══════════════════════════════════════════════════════════════════════════

fn wait_power_enter(ctx: &mut SequencerContext) {
    ctx.set_stage1(false);
    ctx.set_stage2(false);
    ctx.hold_armed_at = None;
}

fn wait_power_update(ctx: &mut SequencerContext) -> Option<StateId> {
    if ctx.edges.emergency_power_activated {
        return Some(StateId::WaitForFloatSwitch);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAIT_FLOAT
// ═══════════════════════════════════════════════════════════════════════════

fn wait_float_enter(ctx: &mut SequencerContext) {
    ctx.set_stage1(true);
}

fn wait_float_update(ctx: &mut SequencerContext) -> Option<StateId> {
    if power_lost(ctx) {
        return Some(StateId::WaitForEmergencyPower);
    }
    if ctx.edges.tank_filled {
        return Some(StateId::WaitForStart);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAIT_START — counting the start hold
// ═══════════════════════════════════════════════════════════════════════════

fn wait_start_enter(ctx: &mut SequencerContext) {
    ctx.set_stage2(true);
    ctx.hold_armed_at = None;
}

fn wait_start_exit(ctx: &mut SequencerContext) {
    ctx.hold_armed_at = None;
}

fn wait_start_update(ctx: &mut SequencerContext) -> Option<StateId> {
    if power_lost(ctx) {
        return Some(StateId::WaitForEmergencyPower);
    }

    // The press edge is handled first so a press and its level in the
    // same tick count from this press, never from an older one.
    if ctx.edges.start_pressed {
        ctx.hold_armed_at = Some(ctx.now_ms);
        ctx.push(SideEffect::HoldArmed { at_ms: ctx.now_ms });
    }

    if !ctx.levels.start {
        // Released: no credit carries over to the next press.
        ctx.hold_armed_at = None;
        return None;
    }

    if ctx.hold_elapsed() {
        return Some(StateId::Started);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STARTED — prop activated
// ═══════════════════════════════════════════════════════════════════════════

fn started_enter(ctx: &mut SequencerContext) {
    ctx.push(SideEffect::Activate);
    match ctx.options.stage1_after_activation {
        Stage1AfterActivation::Keep => ctx.set_stage1(true),
        Stage1AfterActivation::Release => ctx.set_stage1(false),
    }
}

fn started_exit(ctx: &mut SequencerContext) {
    ctx.push(SideEffect::Deactivate);
}

fn started_update(ctx: &mut SequencerContext) -> Option<StateId> {
    if !ctx.edges.emergency_power_deactivated {
        return None;
    }
    if ctx.options.regress_on_power_loss {
        return Some(StateId::WaitForEmergencyPower);
    }
    ctx.push(SideEffect::PowerLossIgnored);
    None
}
