//! Solid-state relay output (stage enables, maglock coil).
//!
//! On ESP-IDF the pin is a `PinDriver` in output mode; on host tests any
//! `embedded_hal::digital::OutputPin` works.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::DriveError;

pub struct RelayOutput<P> {
    pin: P,
    name: &'static str,
    on: bool,
}

impl<P: OutputPin> RelayOutput<P> {
    /// Takes the pin and drives it off.
    pub fn new(pin: P, name: &'static str) -> Result<Self, DriveError> {
        let mut relay = Self {
            pin,
            name,
            on: false,
        };
        relay.write(false)?;
        Ok(relay)
    }

    pub fn set(&mut self, on: bool) -> Result<(), DriveError> {
        self.write(on)?;
        self.on = on;
        Ok(())
    }

    /// Last successfully written state.
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn write(&mut self, on: bool) -> Result<(), DriveError> {
        self.pin
            .set_state(PinState::from(on))
            .map_err(|_| DriveError::PinWrite(self.name))
    }
}
