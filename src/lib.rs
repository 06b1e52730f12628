//! Escape-room prop controller firmware library.
//!
//! Exposes the pure-logic modules (sequencer, arbiter, HTTP routing) and
//! the `embedded-hal` drivers for integration testing on the host.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod arbiter;
pub mod config;
pub mod error;
pub mod http;
pub mod net;
pub mod pins;
pub mod sequencer;

pub mod adapters;
pub mod drivers;
