//! Debounced active-low contact input with latched edges.
//!
//! ## Hardware
//!
//! Dry contact to ground with a pull-up.  A closed contact reads low and
//! counts as *asserted*.
//!
//! ## Edge contract
//!
//! `poll()` runs the debounce at control-tick rate.  When a new level has
//! been stable for the debounce window it becomes the reported level and
//! the matching edge latch is set.  `check_low_and_clear()` and
//! `check_high_and_clear()` return each latched edge exactly once, no
//! matter how often (or how rarely) they are called.
//!
//! The reported level starts high, so a contact that is already closed at
//! boot produces one falling edge after the first debounce window.

use embedded_hal::digital::InputPin;

pub struct DebouncedInput<P> {
    pin: P,
    name: &'static str,
    debounce_ms: u64,
    /// Debounced pin level, true = high (contact open).
    level: bool,
    /// Raw level differing from `level`, and when it was first seen.
    pending: Option<(bool, u64)>,
    fell: bool,
    rose: bool,
}

impl<P: InputPin> DebouncedInput<P> {
    pub fn new(pin: P, name: &'static str, debounce_ms: u32) -> Self {
        Self {
            pin,
            name,
            debounce_ms: u64::from(debounce_ms),
            level: true,
            pending: None,
            fell: false,
            rose: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Sample the pin and advance the debounce.
    pub fn poll(&mut self, now_ms: u64) -> Result<(), P::Error> {
        let raw = self.pin.is_high()?;
        self.update(raw, now_ms);
        Ok(())
    }

    fn update(&mut self, raw: bool, now_ms: u64) {
        if raw == self.level {
            self.pending = None;
            return;
        }

        let since = match self.pending {
            Some((pending, since)) if pending == raw => since,
            _ => {
                self.pending = Some((raw, now_ms));
                now_ms
            }
        };

        if now_ms.saturating_sub(since) >= self.debounce_ms {
            self.level = raw;
            self.pending = None;
            if raw {
                self.rose = true;
            } else {
                self.fell = true;
            }
        }
    }

    /// Debounced pin level (true = high, contact open).
    pub fn state(&self) -> bool {
        self.level
    }

    /// Contact closed.
    pub fn is_asserted(&self) -> bool {
        !self.level
    }

    /// True once per debounced high→low transition.
    pub fn check_low_and_clear(&mut self) -> bool {
        core::mem::take(&mut self.fell)
    }

    /// True once per debounced low→high transition.
    pub fn check_high_and_clear(&mut self) -> bool {
        core::mem::take(&mut self.rose)
    }
}
