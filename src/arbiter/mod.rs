//! Actuator arbitration: automatic position from the sequencer versus a
//! manually latched override.
//!
//! The arbiter never touches a pin.  Each tick the controller asks it
//! which position to drive (if any), hands that to the configured
//! [`ActuatorDrive`](crate::drivers::actuator::ActuatorDrive), then
//! reports back with [`Arbiter::mark_driven`].

use crate::config::{AutoRule, PropConfig, RepulsePolicy};
use crate::sequencer::{SideEffect, StateId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorPosition {
    Closed,
    Open,
}

impl ActuatorPosition {
    /// Fixed protocol token for this position.
    pub fn token(self) -> &'static str {
        match self {
            Self::Closed => "CLOSED",
            Self::Open => "OPEN",
        }
    }
}

/// Manual-override latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverrideState {
    pub is_auto: bool,
    /// Only meaningful while `is_auto` is false.
    pub manual_position: ActuatorPosition,
}

impl Default for OverrideState {
    fn default() -> Self {
        Self {
            is_auto: true,
            manual_position: ActuatorPosition::Closed,
        }
    }
}

/// Door rule: open exactly while the sequencer is in `Started`, unless a
/// manual position is latched.
pub fn apply(state: StateId, ov: &OverrideState) -> ActuatorPosition {
    if !ov.is_auto {
        return ov.manual_position;
    }
    if state == StateId::Started {
        ActuatorPosition::Open
    } else {
        ActuatorPosition::Closed
    }
}

pub struct Arbiter {
    ov: OverrideState,
    auto_rule: AutoRule,
    repulse: RepulsePolicy,
    /// Set by the activation side effect, cleared by deactivation.
    /// Only consulted under [`AutoRule::LatchOnActivation`].
    latched_open: bool,
    last_driven: Option<ActuatorPosition>,
}

impl Arbiter {
    pub fn new(auto_rule: AutoRule, repulse: RepulsePolicy) -> Self {
        Self {
            ov: OverrideState::default(),
            auto_rule,
            repulse,
            latched_open: false,
            last_driven: None,
        }
    }

    pub fn from_config(config: &PropConfig) -> Self {
        Self::new(config.auto_rule, config.repulse)
    }

    pub fn override_state(&self) -> OverrideState {
        self.ov
    }

    pub fn is_auto(&self) -> bool {
        self.ov.is_auto
    }

    /// Latch a manual position.  Returns the position the caller must
    /// command right away.
    pub fn set_manual(&mut self, position: ActuatorPosition) -> ActuatorPosition {
        self.ov = OverrideState {
            is_auto: false,
            manual_position: position,
        };
        position
    }

    /// Hand control back to the sequencer; the next `next_drive` call
    /// re-derives the position.
    pub fn set_auto(&mut self) {
        self.ov.is_auto = true;
    }

    /// Fold a sequencer side effect into the arbiter.  Returns true when
    /// the override mode changed.
    pub fn apply_effect(&mut self, effect: &SideEffect) -> bool {
        match effect {
            SideEffect::Activate => self.latched_open = true,
            SideEffect::Deactivate => self.latched_open = false,
            SideEffect::ReleaseOverride => {
                let was_manual = !self.ov.is_auto;
                self.set_auto();
                return was_manual;
            }
            _ => {}
        }
        false
    }

    /// Position the actuator should be at right now.
    pub fn commanded(&self, state: StateId) -> ActuatorPosition {
        match self.auto_rule {
            AutoRule::FollowState => apply(state, &self.ov),
            AutoRule::LatchOnActivation if !self.ov.is_auto => self.ov.manual_position,
            AutoRule::LatchOnActivation if self.latched_open => ActuatorPosition::Open,
            AutoRule::LatchOnActivation => ActuatorPosition::Closed,
        }
    }

    /// Position to drive on this tick, or `None` when the repulse policy
    /// says the actuator is already there.
    pub fn next_drive(&self, state: StateId) -> Option<ActuatorPosition> {
        let position = self.commanded(state);
        match self.repulse {
            RepulsePolicy::EveryTick => Some(position),
            RepulsePolicy::OnChange if self.last_driven == Some(position) => None,
            RepulsePolicy::OnChange => Some(position),
        }
    }

    /// Record a successful drive.
    pub fn mark_driven(&mut self, position: ActuatorPosition) {
        self.last_driven = Some(position);
    }

    pub fn last_driven(&self) -> Option<ActuatorPosition> {
        self.last_driven
    }
}
