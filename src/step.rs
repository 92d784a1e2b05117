//! Step values of a choreography.
//!
//! A step is a byte. Two values are reserved: [`Step::IDLE`] marks a
//! choreography that is not running, [`Step::RESET`] asks a performance to
//! clean up. Everything else is free for the performance to use.

use embassy_time::Duration;

const STEP_IDLE: u8 = 0xff;
const STEP_RESET: u8 = 0xfe;

/// Highest step index a performance may occupy
pub const MAX_STEP_INDEX: u8 = STEP_RESET - 1;

#[allow(clippy::cast_lossless)]
const STEP_COUNT: u64 = MAX_STEP_INDEX as u64 + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step(u8);

impl Step {
    /// Not running
    pub const IDLE: Self = Self(STEP_IDLE);
    /// Stop request. Passed to a performance, never stored.
    pub const RESET: Self = Self(STEP_RESET);

    /// Application step with the given index.
    ///
    /// Indices above [`MAX_STEP_INDEX`] collide with the reserved values.
    pub const fn at(index: u8) -> Self {
        debug_assert!(index <= MAX_STEP_INDEX);
        Self(index)
    }

    /// Application step for a slot number of any size.
    ///
    /// Slot numbers wrap around the usable step range, so the step only
    /// tells consecutive slots apart. Two calls exactly a multiple of
    /// `MAX_STEP_INDEX + 1` slots apart map to the same step.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn for_slot(slot: u64) -> Self {
        Self((slot % STEP_COUNT) as u8)
    }

    /// Reinterpret a raw byte, sentinels included
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Step index, `None` for the reserved values
    pub const fn index(self) -> Option<u8> {
        match self.0 {
            STEP_IDLE | STEP_RESET => None,
            index => Some(index),
        }
    }

    pub const fn is_idle(self) -> bool {
        self.0 == STEP_IDLE
    }

    pub const fn is_reset(self) -> bool {
        self.0 == STEP_RESET
    }

    /// Cut elapsed time into slots of `2^shift` milliseconds.
    ///
    /// `slice(t, 8)` is the slot number for 256 ms slots.
    pub fn slice(elapsed: Duration, shift: u32) -> u64 {
        elapsed.as_millis().checked_shr(shift).unwrap_or(0)
    }
}
