//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

fn on_off(b: bool) -> &'static str {
    if b { "On" } else { "Off" }
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(s) => {
                info!(
                    "STATUS | actuator={} pos={:?} auto={} | state={:?}({}) | \
                     ssr1={} ssr2={} | epower={} tank={} start={}",
                    on_off(s.actuator_energized),
                    s.actuator_position,
                    s.is_auto,
                    s.state,
                    s.state as u8,
                    on_off(s.stage1),
                    on_off(s.stage2),
                    on_off(s.emergency_power),
                    on_off(s.float_switch),
                    on_off(s.start),
                );
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::HoldArmed { at_ms } => {
                info!("START | pressed at {at_ms} ms (counting)");
            }
            AppEvent::PowerLossIgnored => {
                warn!("POWER | emergency power lost after start");
            }
            AppEvent::OverrideChanged { is_auto, manual_position } => {
                if *is_auto {
                    info!("OVERRIDE | released, actuator back on auto");
                } else {
                    info!("OVERRIDE | manual {:?}", manual_position);
                }
            }
            AppEvent::ActuatorCommanded(pos) => {
                info!("ACTUATOR | {:?}", pos);
            }
            AppEvent::OutputFault { output, error } => {
                warn!("FAULT | {:?}: {}", output, error);
            }
            AppEvent::CommandHandled(cmd) => {
                if !cmd.is_status_query() {
                    info!("CMD | {:?}", cmd);
                }
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
