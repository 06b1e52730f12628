//! Application core — pure prop logic, zero I/O.
//!
//! The [`service::PropController`] ties the sequencer and the actuator
//! arbiter together.  All interaction with hardware happens through the
//! **port traits** in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
