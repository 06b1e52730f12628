//! Pin-level drivers: debounced inputs, relays, actuator shapes, watchdog.

pub mod actuator;
pub mod input;
pub mod relay;
pub mod watchdog;
