//! Non-blocking blink scheduler.
//!
//! Each tick adds the tick period to an accumulator and flips the phase
//! once the accumulator reaches the configured period. Nothing sleeps.

/// Blink phase plus time accumulated since the last toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlinkScheduler {
    accumulator_ms: u32,
    phase: bool,
}

impl BlinkScheduler {
    pub const fn new() -> Self {
        Self {
            accumulator_ms: 0,
            phase: false,
        }
    }

    /// Current output phase (lamp lit / buzzer sounding).
    #[inline]
    pub const fn phase(&self) -> bool {
        self.phase
    }

    /// Milliseconds since the last toggle or reset.
    #[inline]
    pub const fn accumulator_ms(&self) -> u32 {
        self.accumulator_ms
    }

    /// Account for `dt_ms` of elapsed time and return the resulting phase.
    ///
    /// A `period_ms` of zero never toggles.
    pub fn advance(&mut self, dt_ms: u32, period_ms: u32) -> bool {
        if period_ms == 0 {
            return self.phase;
        }
        self.accumulator_ms = self.accumulator_ms.saturating_add(dt_ms);
        if self.accumulator_ms >= period_ms {
            self.phase = !self.phase;
            self.accumulator_ms = 0;
        }
        self.phase
    }

    /// Phase off, accumulator cleared. Called on state entry.
    #[inline]
    pub fn reset(&mut self) {
        self.accumulator_ms = 0;
        self.phase = false;
    }
}
