//! Debounced push button on an `embedded-hal` input pin

use embedded_hal::digital::InputPin;

use crate::clock::ClockSource;
use crate::debounce::{DEFAULT_STABLE_DURATION, DebounceConfig, Debouncer, Edge};

/// Pin level that means "pressed"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Button pulls the pin to ground against a pull-up
    #[default]
    Low,
    /// Button drives the pin high against a pull-down
    High,
}

/// Push button with debouncing
///
/// Poll it once per main loop pass. [`Edge::Rising`] means pressed,
/// [`Edge::Falling`] means released.
pub struct Button<I> {
    pin: I,
    active: ActiveLevel,
    debouncer: Debouncer,
}

impl<I: InputPin> Button<I> {
    pub const fn new(pin: I, active: ActiveLevel) -> Self {
        let config = DebounceConfig {
            stable_duration: DEFAULT_STABLE_DURATION,
        };
        Self::with_config(pin, active, config)
    }

    pub const fn with_config(pin: I, active: ActiveLevel, config: DebounceConfig) -> Self {
        Self {
            pin,
            active,
            debouncer: Debouncer::with_config(config),
        }
    }

    /// Sample the pin and feed the debouncer
    ///
    /// Returns the edge accepted by this call, if any
    pub fn poll<C: ClockSource>(&mut self, clock: &C) -> Result<Option<Edge>, I::Error> {
        let pressed = match self.active {
            ActiveLevel::Low => self.pin.is_low()?,
            ActiveLevel::High => self.pin.is_high()?,
        };
        self.debouncer.update(pressed, clock);
        Ok(self.debouncer.edge())
    }

    /// Whether the button is pressed, after debouncing
    pub const fn is_pressed(&self) -> bool {
        self.debouncer.state()
    }

    pub const fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    /// Release the pin
    pub fn into_inner(self) -> I {
        self.pin
    }
}
