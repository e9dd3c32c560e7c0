//! Elapsed-tick counter for run timeouts and open dwell.

/// Counts ticks spent in the current state.
///
/// The counter is advanced once per evaluated tick and compared with a
/// configured threshold; the threshold is exceeded on the `limit + 1`-th tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutCounter {
    elapsed_ticks: u32,
}

impl TimeoutCounter {
    pub const fn new() -> Self {
        Self { elapsed_ticks: 0 }
    }

    /// Ticks counted since the last reset.
    #[inline]
    pub const fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    /// Count one tick and return the new total. Saturates.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.elapsed_ticks = self.elapsed_ticks.saturating_add(1);
        self.elapsed_ticks
    }

    /// True once more than `limit` ticks have been counted.
    #[inline]
    pub const fn exceeded(&self, limit: u32) -> bool {
        self.elapsed_ticks > limit
    }

    #[inline]
    pub fn reset(&mut self) {
        self.elapsed_ticks = 0;
    }
}
