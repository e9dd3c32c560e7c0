//! Gate controller configuration.
//!
//! Loaded once at startup and immutable afterwards. Every field has a serde
//! default so a partial `[gate]` table is valid. Bounds come from
//! [`crate::consts`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::consts::{
    CLOSING_BLINK_MS_DEFAULT, ERROR_BLINK_MS_DEFAULT, OPEN_DWELL_TICKS_DEFAULT,
    OPENING_BLINK_MS_DEFAULT, RUN_TIMEOUT_TICKS_DEFAULT, TICK_PERIOD_MS, TICK_PERIOD_MS_MAX,
    TICK_PERIOD_MS_MIN, TICK_THRESHOLD_MAX,
};

use super::state::GateState;

/// Timing parameters of the gate state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Controller tick period [ms] (default: 50).
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u32,

    /// Maximum ticks in `Opening`/`Closing` before `ErrorCode::Timeout` (default: 180).
    #[serde(default = "default_run_timeout_ticks")]
    pub run_timeout_ticks: u32,

    /// Ticks held in `Open` before auto-closing (default: 100).
    #[serde(default = "default_open_dwell_ticks")]
    pub open_dwell_ticks: u32,

    /// Lamp/buzzer toggle period while opening [ms] (default: 500).
    #[serde(default = "default_opening_blink_ms")]
    pub opening_blink_ms: u32,

    /// Lamp/buzzer toggle period while closing [ms] (default: 250).
    #[serde(default = "default_closing_blink_ms")]
    pub closing_blink_ms: u32,

    /// Lamp toggle period in `Error` [ms]; `0` keeps the lamp dark (default: 300).
    #[serde(default = "default_error_blink_ms")]
    pub error_blink_ms: u32,
}

fn default_tick_period_ms() -> u32 {
    TICK_PERIOD_MS
}
fn default_run_timeout_ticks() -> u32 {
    RUN_TIMEOUT_TICKS_DEFAULT
}
fn default_open_dwell_ticks() -> u32 {
    OPEN_DWELL_TICKS_DEFAULT
}
fn default_opening_blink_ms() -> u32 {
    OPENING_BLINK_MS_DEFAULT
}
fn default_closing_blink_ms() -> u32 {
    CLOSING_BLINK_MS_DEFAULT
}
fn default_error_blink_ms() -> u32 {
    ERROR_BLINK_MS_DEFAULT
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: TICK_PERIOD_MS,
            run_timeout_ticks: RUN_TIMEOUT_TICKS_DEFAULT,
            open_dwell_ticks: OPEN_DWELL_TICKS_DEFAULT,
            opening_blink_ms: OPENING_BLINK_MS_DEFAULT,
            closing_blink_ms: CLOSING_BLINK_MS_DEFAULT,
            error_blink_ms: ERROR_BLINK_MS_DEFAULT,
        }
    }
}

impl GateConfig {
    /// Validate parameter bounds.
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_period_ms < TICK_PERIOD_MS_MIN || self.tick_period_ms > TICK_PERIOD_MS_MAX {
            return Err(format!(
                "tick_period_ms {} out of range [{}, {}]",
                self.tick_period_ms, TICK_PERIOD_MS_MIN, TICK_PERIOD_MS_MAX
            ));
        }
        for (name, value) in [
            ("run_timeout_ticks", self.run_timeout_ticks),
            ("open_dwell_ticks", self.open_dwell_ticks),
        ] {
            if value == 0 || value > TICK_THRESHOLD_MAX {
                return Err(format!(
                    "{name} {value} out of range [1, {TICK_THRESHOLD_MAX}]"
                ));
            }
        }
        for (name, value) in [
            ("opening_blink_ms", self.opening_blink_ms),
            ("closing_blink_ms", self.closing_blink_ms),
        ] {
            if value < self.tick_period_ms {
                return Err(format!(
                    "{name} {value} shorter than tick_period_ms {}",
                    self.tick_period_ms
                ));
            }
        }
        if self.error_blink_ms != 0 && self.error_blink_ms < self.tick_period_ms {
            return Err(format!(
                "error_blink_ms {} must be 0 or at least tick_period_ms {}",
                self.error_blink_ms, self.tick_period_ms
            ));
        }
        Ok(())
    }

    /// Tick period as a `Duration`.
    #[inline]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_period_ms))
    }

    /// Lamp blink period for a state, `None` when the lamp does not blink there.
    pub const fn blink_period_ms(&self, state: GateState) -> Option<u32> {
        match state {
            GateState::Opening => Some(self.opening_blink_ms),
            GateState::Closing => Some(self.closing_blink_ms),
            GateState::Error if self.error_blink_ms > 0 => Some(self.error_blink_ms),
            _ => None,
        }
    }
}
