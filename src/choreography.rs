//! Choreography engine
//!
//! A choreography is a tiny state machine advanced by polling. Its
//! [`Performance`] maps the time elapsed since start to a [`Step`] and fires
//! side effects when the step changes. Nothing here blocks or allocates, so
//! any number of choreographies can share one main loop.

use embassy_time::Duration;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::clock::{ClockSource, Timestamp};
use crate::step::Step;

const NO_TIME: Duration = Duration::from_millis(0);

/// Behavior advanced by a [`Choreography`]
///
/// `advance` receives the step the choreography currently occupies and the
/// time elapsed since it was started. It returns the step for that time and
/// must:
///
/// - derive the step from `elapsed` only, not from how often it is called;
/// - apply side effects only when the new step differs from `previous`;
/// - return [`Step::IDLE`] once the performance is complete;
/// - on `previous == Step::RESET`, release whatever it drives and return
///   [`Step::IDLE`];
/// - never return [`Step::RESET`].
///
/// `previous == Step::IDLE` with zero elapsed time means the choreography is
/// starting.
pub trait Performance {
    fn advance(&mut self, previous: Step, elapsed: Duration) -> Step;
}

impl<P: Performance + ?Sized> Performance for &mut P {
    fn advance(&mut self, previous: Step, elapsed: Duration) -> Step {
        (**self).advance(previous, elapsed)
    }
}

/// Adapts a plain step function into a [`Performance`]
///
/// ```ignore
/// let blink = StepFn(|previous: Step, elapsed: Duration| { ... });
/// ```
pub struct StepFn<F>(pub F);

impl<F> Performance for StepFn<F>
where
    F: FnMut(Step, Duration) -> Step,
{
    fn advance(&mut self, previous: Step, elapsed: Duration) -> Step {
        (self.0)(previous, elapsed)
    }
}

/// One independently running behavior
///
/// `step() == Step::IDLE` holds exactly when the choreography is not running.
#[derive(Debug, Clone)]
pub struct Choreography<P> {
    start: Timestamp,
    step: Step,
    looping: bool,
    performance: P,
}

impl<P: Performance> Choreography<P> {
    /// Create an idle choreography.
    ///
    /// A looping choreography restarts as soon as its performance completes.
    pub const fn new(looping: bool, performance: P) -> Self {
        Self {
            start: Timestamp::ZERO,
            step: Step::IDLE,
            looping,
            performance,
        }
    }

    /// Create an idle choreography that runs once per start
    pub const fn once(performance: P) -> Self {
        Self::new(false, performance)
    }

    /// Create an idle choreography that restarts on completion
    pub const fn repeating(performance: P) -> Self {
        Self::new(true, performance)
    }

    /// Start (or restart) from the beginning
    pub fn start<C: ClockSource>(&mut self, clock: &C) {
        self.start_at(clock.now());
    }

    pub fn start_at(&mut self, now: Timestamp) {
        #[cfg(feature = "esp32-log")]
        println!("[Choreography.start] starting at {}", now.ticks());
        self.start = now;
        let step = self.performance.advance(Step::IDLE, NO_TIME);
        self.commit(step);
    }

    /// Advance according to the time elapsed since start.
    ///
    /// Does nothing while idle. A looping choreography that completes is
    /// restarted within the same call, so it never reports idle between runs.
    pub fn tick<C: ClockSource>(&mut self, clock: &C) {
        self.tick_at(clock.now());
    }

    pub fn tick_at(&mut self, now: Timestamp) {
        if self.step.is_idle() {
            return;
        }

        let elapsed = now.elapsed_since(self.start);
        let step = self.performance.advance(self.step, elapsed);
        self.commit(step);

        if self.step.is_idle() && self.looping {
            self.start_at(now);
        }
    }

    /// Stop immediately, letting the performance undo its side effects
    pub fn stop(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!("[Choreography.stop] stopping at step {}", self.step.raw());
        let step = self.performance.advance(Step::RESET, NO_TIME);
        self.commit(step);
    }

    /// Start if idle, stop otherwise
    pub fn toggle<C: ClockSource>(&mut self, clock: &C) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(clock);
        }
    }

    fn commit(&mut self, step: Step) {
        // RESET is a request, not a state
        self.step = if step.is_reset() { Step::IDLE } else { step };
    }

    pub const fn step(&self) -> Step {
        self.step
    }

    pub const fn is_running(&self) -> bool {
        !self.step.is_idle()
    }

    pub const fn is_looping(&self) -> bool {
        self.looping
    }

    /// Change looping behavior. Takes effect at the next completion.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Time of the last (re)start
    pub const fn started_at(&self) -> Timestamp {
        self.start
    }

    pub const fn performance(&self) -> &P {
        &self.performance
    }

    pub fn performance_mut(&mut self) -> &mut P {
        &mut self.performance
    }
}
