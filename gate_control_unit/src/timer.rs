//! Tick-based timers.
//!
//! Per-state elapsed-tick counting and non-blocking blink scheduling. Both
//! are reset on every state entry through [`Timers::enter_state`].

pub mod blink;
pub mod timeout;

use blink::BlinkScheduler;
use timeout::TimeoutCounter;

/// Timer state carried between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timers {
    /// Ticks spent in the current state.
    pub elapsed: TimeoutCounter,
    /// Lamp/buzzer blink phase and accumulator.
    pub blink: BlinkScheduler,
}

impl Timers {
    pub const fn new() -> Self {
        Self {
            elapsed: TimeoutCounter::new(),
            blink: BlinkScheduler::new(),
        }
    }

    /// Reset both timers for a freshly entered state.
    #[inline]
    pub fn enter_state(&mut self) {
        self.elapsed.reset();
        self.blink.reset();
    }
}
