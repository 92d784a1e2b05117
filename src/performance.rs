//! Ready-made performances
//!
//! Pin patterns and strip sequences cut elapsed time into slots of
//! `2^shift` milliseconds, melodies into notes of their own length. All of
//! them touch hardware only when the slot or note changes.

use embassy_time::Duration;
use embedded_hal::digital::{OutputPin, PinState};

use crate::choreography::Performance;
use crate::step::Step;
use crate::{OutputDriver, Rgb, ToneOutput};

/// On/off levels of a simple blink: 256 ms on, 256 ms off
pub const BLINK: &[bool] = &[true, false];

/// Slot width of [`BLINK`], as a shift: `2^8` ms
pub const BLINK_SHIFT: u32 = 8;

/// Plays a sequence of pin levels, one per slot
///
/// The pattern ends after its last slot, whatever its length. A failed pin
/// write ends the performance.
#[derive(Debug, Clone)]
pub struct PinPattern<O, L = &'static [bool]> {
    pin: O,
    levels: L,
    shift: u32,
}

impl<O: OutputPin> PinPattern<O> {
    /// 256 ms on, 256 ms off
    pub const fn blink(pin: O) -> Self {
        Self::new(pin, BLINK, BLINK_SHIFT)
    }
}

impl<O: OutputPin, L: AsRef<[bool]>> PinPattern<O, L> {
    /// Play `levels` with slots of `2^shift` milliseconds
    pub const fn new(pin: O, levels: L, shift: u32) -> Self {
        Self { pin, levels, shift }
    }

    pub fn pin_mut(&mut self) -> &mut O {
        &mut self.pin
    }
}

impl<O: OutputPin, L: AsRef<[bool]>> Performance for PinPattern<O, L> {
    fn advance(&mut self, previous: Step, elapsed: Duration) -> Step {
        if previous.is_reset() {
            // Stop has no error channel, a failed write leaves the pin as it was
            let _ = self.pin.set_low();
            return Step::IDLE;
        }

        let slot = Step::slice(elapsed, self.shift);
        let Some(&level) = usize::try_from(slot)
            .ok()
            .and_then(|slot| self.levels.as_ref().get(slot))
        else {
            return Step::IDLE;
        };
        let step = Step::for_slot(slot);
        if step == previous {
            return step;
        }

        match self.pin.set_state(PinState::from(level)) {
            Ok(()) => step,
            Err(_) => Step::IDLE,
        }
    }
}

/// Scrolls a palette sequence along an LED strip
///
/// On frame `f`, LED `i` shows `palette[sequence[(f + i) % sequence.len()]]`.
/// A run lasts `cycles` passes over the sequence, so a looping choreography
/// keeps the strip moving. Stopping blanks the strip.
pub struct StripSequence<'a, D, const LEDS: usize> {
    driver: D,
    palette: &'a [Rgb],
    sequence: &'a [u8],
    shift: u32,
    cycles: u8,
    frame: [Rgb; LEDS],
}

impl<'a, D: OutputDriver, const LEDS: usize> StripSequence<'a, D, LEDS> {
    /// Show `sequence` (indices into `palette`) with frames of `2^shift` milliseconds
    pub const fn new(driver: D, palette: &'a [Rgb], sequence: &'a [u8], shift: u32) -> Self {
        Self {
            driver,
            palette,
            sequence,
            shift,
            cycles: 1,
            frame: [Rgb { r: 0, g: 0, b: 0 }; LEDS],
        }
    }

    /// Set the number of sequence passes per run
    #[must_use]
    pub const fn with_cycles(mut self, cycles: u8) -> Self {
        self.cycles = cycles;
        self
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Last frame written to the driver
    pub const fn frame(&self) -> &[Rgb; LEDS] {
        &self.frame
    }

    fn total_frames(&self) -> u64 {
        self.sequence.len() as u64 * u64::from(self.cycles)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, frame: u64) {
        let len = self.sequence.len() as u64;
        for (i, led) in self.frame.iter_mut().enumerate() {
            let position = ((frame + i as u64) % len) as usize;
            *led = self
                .palette
                .get(usize::from(self.sequence[position]))
                .copied()
                .unwrap_or_default();
        }
        self.driver.write(&self.frame);
    }

    fn blank(&mut self) {
        self.frame = [Rgb::default(); LEDS];
        self.driver.write(&self.frame);
    }
}

impl<D: OutputDriver, const LEDS: usize> Performance for StripSequence<'_, D, LEDS> {
    fn advance(&mut self, previous: Step, elapsed: Duration) -> Step {
        if previous.is_reset() {
            self.blank();
            return Step::IDLE;
        }

        let frame = Step::slice(elapsed, self.shift);
        if frame >= self.total_frames() {
            return Step::IDLE;
        }
        let step = Step::for_slot(frame);
        if step != previous {
            self.render(frame);
        }
        step
    }
}

/// One note of a [`Melody`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    /// Pitch in Hz, 0 for a rest
    pub frequency_hz: u16,
    pub duration: Duration,
}

impl Note {
    pub const fn tone(frequency_hz: u16, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
        }
    }

    pub const fn rest(duration_ms: u64) -> Self {
        Self::tone(0, duration_ms)
    }

    pub const fn is_rest(&self) -> bool {
        self.frequency_hz == 0
    }
}

/// Plays a list of notes of individual length on a [`ToneOutput`]
///
/// The step is the index of the sounding note, found by summing the note
/// durations up to the elapsed time. The output is silenced when the last
/// note ends and on stop.
pub struct Melody<'a, T> {
    output: T,
    notes: &'a [Note],
}

impl<'a, T: ToneOutput> Melody<'a, T> {
    pub const fn new(output: T, notes: &'a [Note]) -> Self {
        Self { output, notes }
    }

    /// Total play time of one run
    pub fn length(&self) -> Duration {
        self.notes
            .iter()
            .fold(Duration::from_millis(0), |total, note| total + note.duration)
    }

    pub const fn output(&self) -> &T {
        &self.output
    }

    /// Note sounding `elapsed` after start, with its index
    fn note_at(&self, elapsed: Duration) -> Option<(usize, Note)> {
        let mut end = Duration::from_millis(0);
        self.notes
            .iter()
            .copied()
            .enumerate()
            .find(|(_, note)| {
                end += note.duration;
                elapsed < end
            })
    }
}

impl<T: ToneOutput> Performance for Melody<'_, T> {
    fn advance(&mut self, previous: Step, elapsed: Duration) -> Step {
        if previous.is_reset() {
            self.output.silence();
            return Step::IDLE;
        }

        let Some((index, note)) = self.note_at(elapsed) else {
            self.output.silence();
            return Step::IDLE;
        };
        let step = Step::for_slot(index as u64);
        if step == previous {
            return step;
        }

        #[cfg(feature = "esp32-log")]
        esp_println::println!("[Melody.advance] note {} at {} Hz", index, note.frequency_hz);
        if note.is_rest() {
            self.output.silence();
        } else {
            self.output.play(note.frequency_hz);
        }
        step
    }
}
