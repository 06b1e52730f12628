//! GPIO assignments for the prop controller board.
//!
//! Single source of truth: `main.rs` builds every pin driver from these
//! numbers.

// ---------------------------------------------------------------------------
// Contact inputs (dry contacts to GND, internal pull-up, active LOW)
// ---------------------------------------------------------------------------

/// Emergency-power relay contact.  LOW = emergency power present.
pub const EMERGENCY_POWER_GPIO: i32 = 4;
/// Tank float switch.  LOW = tank full.
pub const FLOAT_SWITCH_GPIO: i32 = 5;
/// Start button.  LOW = pressed.
pub const START_BUTTON_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Stage-enable solid-state relays (active HIGH)
// ---------------------------------------------------------------------------

pub const SSR1_GPIO: i32 = 15;
pub const SSR2_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Actuator outputs (active HIGH)
// ---------------------------------------------------------------------------

/// Maglock coil, or the single relay of a latched actuator.
pub const ACTUATOR_GPIO: i32 = 17;
/// Bistable actuator: open-direction line.
pub const LINAC_OPEN_GPIO: i32 = 18;
/// Bistable actuator: close-direction line.
pub const LINAC_CLOSE_GPIO: i32 = 21;
