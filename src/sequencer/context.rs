//! Context threaded through every sequencer handler.
//!
//! Handlers read the tick inputs (edges, levels, clock) from
//! `SequencerContext` and write their requested outputs into
//! `effects`.  Nothing in here touches hardware; the controller applies
//! the effects after the tick returns.

use heapless::Vec;

use crate::config::{PropConfig, Stage1AfterActivation};

// ---------------------------------------------------------------------------
// Tick inputs (written by the driver layer before each tick)
// ---------------------------------------------------------------------------

/// Edge flags consumed from the input drivers.  Each flag is true at
/// most once per physical transition; the drivers clear them on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorEdges {
    /// Emergency-power contact closed.
    pub emergency_power_activated: bool,
    /// Emergency-power contact opened.
    pub emergency_power_deactivated: bool,
    /// Float switch reports the tank full.
    pub tank_filled: bool,
    /// Start input pressed.
    pub start_pressed: bool,
}

impl SensorEdges {
    pub const NONE: Self = Self {
        emergency_power_activated: false,
        emergency_power_deactivated: false,
        tank_filled: false,
        start_pressed: false,
    };
}

/// Current (debounced) levels.  `true` means the input is asserted,
/// i.e. the active-low contact is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorLevels {
    pub emergency_power: bool,
    pub float_switch: bool,
    pub start: bool,
}

// ---------------------------------------------------------------------------
// Side effects (written by handlers, applied by the controller)
// ---------------------------------------------------------------------------

/// Output request produced by a state handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// Drive the stage-1 enable output.
    Stage1(bool),
    /// Drive the stage-2 enable output.
    Stage2(bool),
    /// The prop activated: the actuator should open.
    Activate,
    /// Activation cleared: the actuator should close.
    Deactivate,
    /// Hand the actuator back to automatic control.
    ReleaseOverride,
    /// Start press seen; the hold timer now counts from `at_ms`.
    HoldArmed { at_ms: u64 },
    /// Emergency power dropped but this deployment does not regress.
    PowerLossIgnored,
}

/// Upper bound on effects a single tick can produce (exit + enter of a
/// reset transition is the worst case at five).
pub const MAX_EFFECTS: usize = 8;

pub type Effects = Vec<SideEffect, MAX_EFFECTS>;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// The subset of [`PropConfig`] that shapes the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerOptions {
    pub regress_on_power_loss: bool,
    pub stage1_after_activation: Stage1AfterActivation,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self::from(&PropConfig::default())
    }
}

impl From<&PropConfig> for SequencerOptions {
    fn from(config: &PropConfig) -> Self {
        Self {
            regress_on_power_loss: config.regress_on_power_loss,
            stage1_after_activation: config.stage1_after_activation,
        }
    }
}

// ---------------------------------------------------------------------------
// SequencerContext
// ---------------------------------------------------------------------------

pub struct SequencerContext {
    // -- Tick inputs --
    pub edges: SensorEdges,
    pub levels: SensorLevels,
    /// Monotonic time of this tick (ms).
    pub now_ms: u64,
    /// Required continuous start hold (ms).
    pub hold_duration_ms: u64,

    // -- Sequencer-owned state --
    stage1: bool,
    stage2: bool,
    /// Press time of the start hold being counted, if any.
    pub hold_armed_at: Option<u64>,
    pub options: SequencerOptions,

    // -- Outputs --
    pub effects: Effects,
}

impl SequencerContext {
    pub fn new(options: SequencerOptions) -> Self {
        Self {
            edges: SensorEdges::NONE,
            levels: SensorLevels::default(),
            now_ms: 0,
            hold_duration_ms: 0,
            stage1: false,
            stage2: false,
            hold_armed_at: None,
            options,
            effects: Vec::new(),
        }
    }

    pub fn stage1(&self) -> bool {
        self.stage1
    }

    pub fn stage2(&self) -> bool {
        self.stage2
    }

    /// Set stage 1, recording an effect only when the output changes.
    pub fn set_stage1(&mut self, on: bool) {
        if self.stage1 != on {
            self.stage1 = on;
            self.push(SideEffect::Stage1(on));
        }
    }

    /// Set stage 2, recording an effect only when the output changes.
    pub fn set_stage2(&mut self, on: bool) {
        if self.stage2 != on {
            self.stage2 = on;
            self.push(SideEffect::Stage2(on));
        }
    }

    pub fn push(&mut self, effect: SideEffect) {
        let pushed = self.effects.push(effect);
        debug_assert!(pushed.is_ok(), "effect buffer overflow");
    }

    /// True once the armed start press has been held for the full duration.
    pub fn hold_elapsed(&self) -> bool {
        self.hold_armed_at
            .is_some_and(|at| self.now_ms.saturating_sub(at) >= self.hold_duration_ms)
    }
}
