//! Time-threshold debouncing of a binary input.
//!
//! A new raw level is accepted only if it differs from the accepted one and
//! more than the stable duration has passed since the last accepted change.
//! Readings that arrive inside the window are dropped, not queued, so two real
//! transitions closer than the window merge into the first one.

use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::clock::{ClockSource, Timestamp};

/// Default minimum time between two accepted changes
pub const DEFAULT_STABLE_DURATION: Duration = Duration::from_millis(50);

/// Direction of an accepted change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Inactive to active
    Rising,
    /// Active to inactive
    Falling,
}

/// Configuration for a [`Debouncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceConfig {
    /// Bounce rejection window. Longer windows reject more noise but react slower.
    pub stable_duration: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            stable_duration: DEFAULT_STABLE_DURATION,
        }
    }
}

/// Debounce state of one input
#[derive(Debug, Clone)]
pub struct Debouncer {
    state: bool,
    previous_state: bool,
    changed: bool,
    stable_duration: Duration,
    last_change: Timestamp,
}

impl Debouncer {
    /// Inactive debouncer with [`DEFAULT_STABLE_DURATION`]
    pub const fn new() -> Self {
        Self::with_stable_duration(DEFAULT_STABLE_DURATION)
    }

    pub const fn with_config(config: DebounceConfig) -> Self {
        Self::with_stable_duration(config.stable_duration)
    }

    const fn with_stable_duration(stable_duration: Duration) -> Self {
        Self {
            state: false,
            previous_state: false,
            changed: false,
            stable_duration,
            last_change: Timestamp::ZERO,
        }
    }

    /// Feed the latest raw reading, timestamped by `clock`
    pub fn update<C: ClockSource>(&mut self, raw: bool, clock: &C) {
        self.update_at(raw, clock.now());
    }

    /// Feed the latest raw reading taken at `now`
    pub fn update_at(&mut self, raw: bool, now: Timestamp) {
        self.changed = false;

        if raw == self.state {
            return;
        }
        if now.elapsed_since(self.last_change) <= self.stable_duration {
            return;
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "[Debouncer.update] accepted {:?} -> {:?} at {}",
            self.state,
            raw,
            now.ticks()
        );
        self.previous_state = self.state;
        self.state = raw;
        self.changed = true;
        self.last_change = now;
    }

    /// Accepted (debounced) state
    pub const fn state(&self) -> bool {
        self.state
    }

    /// State before the last accepted change
    pub const fn previous_state(&self) -> bool {
        self.previous_state
    }

    /// Whether the last `update` call committed a change
    pub const fn changed(&self) -> bool {
        self.changed
    }

    /// Edge committed by the last `update` call
    pub const fn edge(&self) -> Option<Edge> {
        match (self.changed, self.state) {
            (false, _) => None,
            (true, true) => Some(Edge::Rising),
            (true, false) => Some(Edge::Falling),
        }
    }

    pub const fn stable_duration(&self) -> Duration {
        self.stable_duration
    }

    pub fn set_stable_duration(&mut self, stable_duration: Duration) {
        self.stable_duration = stable_duration;
    }

    /// Time of the last accepted change
    pub const fn last_change(&self) -> Timestamp {
        self.last_change
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}
