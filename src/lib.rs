#![no_std]

#[cfg(test)]
extern crate std;

pub mod button;
pub mod choreography;
pub mod clock;
pub mod debounce;
pub mod ensemble;
pub mod morse;
pub mod performance;
pub mod step;

pub use button::{ActiveLevel, Button};
pub use choreography::{Choreography, Performance, StepFn};
pub use clock::{
    ClockSource, EmbassyClock, ManualClock, TICK_RATE_HZ, TickCounter, TickTimer, Timestamp,
};
pub use debounce::{DebounceConfig, Debouncer, Edge};
pub use ensemble::{ChoreographyId, Ensemble, EnsembleFull};
pub use morse::MorseError;
pub use performance::{Melody, Note, PinPattern, StripSequence};
pub use step::Step;

pub use embassy_time::{Duration, Instant};

/// Color of one LED
pub type Rgb = smart_leds::RGB8;

/// Abstract LED driver trait
///
/// Implement this trait to drive an LED strip from a [`StripSequence`].
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

impl<D: OutputDriver + ?Sized> OutputDriver for &mut D {
    fn write(&mut self, colors: &[Rgb]) {
        (**self).write(colors);
    }
}

/// Sound output for a [`Melody`], e.g. a buzzer on a PWM channel
pub trait ToneOutput {
    /// Sound a square wave of `frequency_hz`
    fn play(&mut self, frequency_hz: u16);

    fn silence(&mut self);
}

impl<T: ToneOutput + ?Sized> ToneOutput for &mut T {
    fn play(&mut self, frequency_hz: u16) {
        (**self).play(frequency_hz);
    }

    fn silence(&mut self) {
        (**self).silence();
    }
}
