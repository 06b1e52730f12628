//! Prop configuration parameters
//!
//! All tunable parameters for one deployment of the prop controller.
//! The same firmware runs every prop variant; a variant is nothing more
//! than one of the named profiles below (or a JSON document derived
//! from one).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest start-button hold we accept (one hour).
const MAX_START_HOLD_MS: u32 = 3_600_000;

/// Physical drive shape of the prop's single actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorKind {
    /// Sliding-door maglock: energised = locked.
    Maglock,
    /// Two-directional linear actuator driven by timed direction pulses.
    Bistable,
    /// Plain latched on/off relay.
    Latched,
}

/// Which path family the actuator commands are served under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorRoutes {
    /// `/door/open`, `/door/close`, `/door/auto`
    Door,
    /// `/linac/open`, `/linac/close`, `/linac/auto`
    Linac,
}

/// How the automatic actuator position is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoRule {
    /// Open exactly while the sequencer is in `Started`.
    FollowState,
    /// Open from the activation side effect until it is cleared by a
    /// power-loss regression or a game reset.
    LatchOnActivation,
}

/// When the arbiter re-issues the actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepulsePolicy {
    /// Re-assert the commanded position on every tick.
    EveryTick,
    /// Only drive the actuator when the commanded position changes.
    OnChange,
}

/// What happens to the stage-1 output when the prop activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage1AfterActivation {
    /// Leave stage 1 energised for the cool-down.
    Keep,
    /// Drop stage 1 on activation.
    Release,
}

/// Core prop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropConfig {
    // --- Sequencing ---
    /// Continuous start-input hold required before activation (ms)
    pub start_hold_ms: u32,
    /// Return to WaitForEmergencyPower when emergency power drops
    pub regress_on_power_loss: bool,
    /// Boot into the Setup (pre-arm) state and expose `/game/*`
    pub setup_mode: bool,
    /// Stage-1 behaviour on activation
    pub stage1_after_activation: Stage1AfterActivation,

    // --- Actuator ---
    pub actuator: ActuatorKind,
    pub actuator_routes: ActuatorRoutes,
    pub auto_rule: AutoRule,
    pub repulse: RepulsePolicy,
    /// Direction pulse length for bistable actuators (ms)
    pub pulse_ms: u32,

    // --- Timing ---
    /// Control loop interval (ms)
    pub tick_interval_ms: u32,
    /// Input debounce window (ms)
    pub debounce_ms: u32,
    /// Periodic status line interval (ms), 0 disables it
    pub status_log_interval_ms: u32,

    // --- Network ---
    pub http_port: u16,
}

impl Default for PropConfig {
    fn default() -> Self {
        Self::override_door()
    }
}

impl PropConfig {
    /// Maglock door with manual override and power-loss regression.
    pub fn override_door() -> Self {
        Self {
            start_hold_ms: 3000,
            regress_on_power_loss: true,
            setup_mode: false,
            stage1_after_activation: Stage1AfterActivation::Release,

            actuator: ActuatorKind::Maglock,
            actuator_routes: ActuatorRoutes::Door,
            auto_rule: AutoRule::FollowState,
            repulse: RepulsePolicy::EveryTick,
            pulse_ms: 0,

            tick_interval_ms: 20,  // 50 Hz
            debounce_ms: 50,
            status_log_interval_ms: 1000,

            http_port: 80,
        }
    }

    /// Setup-capable sliding door.  Power loss is reported but never
    /// rewinds the sequence, and stage 1 stays on after the start.
    pub fn sliding_door() -> Self {
        Self {
            regress_on_power_loss: false,
            setup_mode: true,
            stage1_after_activation: Stage1AfterActivation::Keep,
            ..Self::override_door()
        }
    }

    /// Linear actuator that latches open on activation.
    pub fn linear_actuator() -> Self {
        Self {
            actuator: ActuatorKind::Bistable,
            actuator_routes: ActuatorRoutes::Linac,
            auto_rule: AutoRule::LatchOnActivation,
            repulse: RepulsePolicy::OnChange,
            pulse_ms: 3000,
            ..Self::override_door()
        }
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.start_hold_ms > MAX_START_HOLD_MS {
            return Err(ConfigError::ValidationFailed("start_hold_ms exceeds one hour"));
        }
        if self.debounce_ms > self.start_hold_ms {
            return Err(ConfigError::ValidationFailed("debounce_ms exceeds start_hold_ms"));
        }
        if self.actuator == ActuatorKind::Bistable && self.pulse_ms == 0 {
            return Err(ConfigError::ValidationFailed("bistable actuator needs pulse_ms > 0"));
        }
        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be > 0"));
        }
        Ok(())
    }

    /// Parse a JSON document (missing fields take the default profile's
    /// values) and validate the result.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }
}
