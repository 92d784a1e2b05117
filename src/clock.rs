//! Millisecond clock shared between the tick interrupt and the main loop.
//!
//! The hardware timer fires at [`TICK_RATE_HZ`] and bumps a 32-bit counter.
//! The main loop reads it through [`TickCounter::now`], which retries until it
//! gets a sample the interrupt did not touch mid-read. The counter wraps after
//! about 49.7 days; all elapsed-time math goes through [`Timestamp::elapsed_since`],
//! which is correct modulo 2^32.

use core::cell::{Cell, UnsafeCell};
use core::sync::atomic::{AtomicBool, Ordering, compiler_fence};

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Tick interrupt frequency. One tick is one millisecond.
pub const TICK_RATE_HZ: u32 = 1000;

/// Raw reading of a millisecond tick counter.
///
/// Timestamps are opaque points on a wrapping 32-bit time line. Only the
/// difference between two of them carries meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(u32);

impl Timestamp {
    /// Counter value at boot
    pub const ZERO: Self = Self(0);

    pub const fn from_ticks(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Truncate an embassy instant to the 32-bit millisecond time line
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_instant(instant: Instant) -> Self {
        Self(instant.as_millis() as u32)
    }

    pub const fn ticks(self) -> u32 {
        self.0
    }

    /// Time elapsed from `earlier` to `self`, correct across one counter wrap.
    #[allow(clippy::cast_lossless)]
    pub const fn elapsed_since(self, earlier: Self) -> Duration {
        Duration::from_millis(self.0.wrapping_sub(earlier.0) as u64)
    }

    /// Move the timestamp forward, wrapping like the hardware counter does
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn wrapping_add(self, duration: Duration) -> Self {
        Self(self.0.wrapping_add(duration.as_millis() as u32))
    }
}

/// Anything that can tell the current time on the millisecond time line
pub trait ClockSource {
    /// Read the current time
    fn now(&self) -> Timestamp;
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Hardware timer able to raise a periodic interrupt.
///
/// Implement this on top of the chip HAL. The interrupt handler must call
/// [`TickCounter::on_tick`].
pub trait TickTimer {
    /// Configure the timer to fire `rate_hz` times per second and enable
    /// its interrupt.
    fn start_periodic(&mut self, rate_hz: u32);
}

/// Tick counter fed by a periodic timer interrupt.
///
/// Place it in a `static` and call [`TickCounter::on_tick`] from the timer
/// interrupt handler:
///
/// ```ignore
/// static CLOCK: TickCounter = TickCounter::new();
///
/// #[interrupt]
/// fn TIMER0_COMPA() {
///     unsafe { CLOCK.on_tick() };
/// }
/// ```
///
/// Reads are lock-free. The interrupt raises `dirty` before it touches the
/// counter; [`TickCounter::now`] clears the flag, copies the counter and starts
/// over if the flag came back set.
pub struct TickCounter {
    ticks: UnsafeCell<u32>,
    dirty: AtomicBool,
}

// SAFETY: single-core targets only. The counter is written either from the
// tick interrupt or inside a critical section, never from two contexts at
// once. Readers detect a concurrent write through `dirty` and retry.
unsafe impl Sync for TickCounter {}

impl TickCounter {
    pub const fn new() -> Self {
        Self {
            ticks: UnsafeCell::new(0),
            dirty: AtomicBool::new(false),
        }
    }

    /// Start the periodic tick interrupt at [`TICK_RATE_HZ`].
    pub fn init<T: TickTimer>(&self, timer: &mut T) {
        #[cfg(feature = "esp32-log")]
        println!("[TickCounter.init] starting tick timer at {} Hz", TICK_RATE_HZ);
        timer.start_periodic(TICK_RATE_HZ);
    }

    /// Advance the counter by one tick.
    ///
    /// # Safety
    ///
    /// Must only be called from the tick interrupt handler (or from a single
    /// context that the main loop cannot preempt). Two concurrent callers
    /// would race on the counter.
    pub unsafe fn on_tick(&self) {
        self.dirty.store(true, Ordering::Relaxed);
        compiler_fence(Ordering::SeqCst);
        let ticks = self.ticks.get();
        // SAFETY: the caller guarantees this is the only writer right now.
        unsafe { ticks.write_volatile(ticks.read_volatile().wrapping_add(1)) };
    }

    /// Read the counter without tearing.
    pub fn now(&self) -> Timestamp {
        self.read_guarded(|| {})
    }

    /// Retry loop behind [`TickCounter::now`]. `after_sample` runs between
    /// copying the counter and checking the flag, where an interrupt would
    /// invalidate the sample.
    #[inline(always)]
    fn read_guarded(&self, mut after_sample: impl FnMut()) -> Timestamp {
        loop {
            self.dirty.store(false, Ordering::Relaxed);
            compiler_fence(Ordering::SeqCst);
            // SAFETY: a torn read is possible only if the interrupt fired in
            // between, in which case `dirty` is set and the sample is dropped.
            let ticks = unsafe { self.ticks.get().read_volatile() };
            after_sample();
            compiler_fence(Ordering::SeqCst);
            if !self.dirty.load(Ordering::Relaxed) {
                return Timestamp(ticks);
            }
        }
    }

    /// Overwrite the counter, e.g. to resynchronise it with an external time base.
    pub fn set(&self, now: Timestamp) {
        critical_section::with(|_| {
            self.dirty.store(true, Ordering::Relaxed);
            compiler_fence(Ordering::SeqCst);
            // SAFETY: the tick interrupt is masked inside the critical section.
            unsafe { self.ticks.get().write_volatile(now.ticks()) };
        });
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for TickCounter {
    fn now(&self) -> Timestamp {
        TickCounter::now(self)
    }
}

/// Clock backed by the `embassy-time` driver.
///
/// Useful on targets where embassy already owns a hardware timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl ClockSource for EmbassyClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_instant(Instant::now())
    }
}

/// Clock that only moves when told to.
///
/// Drives choreographies from synthetic time: host-side previews, replays
/// and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub const fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    /// Move forward by `duration`, wrapping at the counter width
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get().wrapping_add(duration));
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
