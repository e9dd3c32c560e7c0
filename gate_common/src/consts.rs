//! System-wide constants for the gate workspace.
//!
//! Single source of truth for default timings and parameter bounds.
//! Imported by all crates; do not duplicate these values.

use static_assertions::const_assert;

/// Default controller tick period [ms].
pub const TICK_PERIOD_MS: u32 = 50;
/// Minimum tick period [ms].
pub const TICK_PERIOD_MS_MIN: u32 = 1;
/// Maximum tick period [ms].
pub const TICK_PERIOD_MS_MAX: u32 = 1000;

/// Default maximum ticks allowed in `Opening`/`Closing` before a run timeout.
pub const RUN_TIMEOUT_TICKS_DEFAULT: u32 = 180;

/// Default ticks the gate dwells in `Open` before auto-closing.
pub const OPEN_DWELL_TICKS_DEFAULT: u32 = 100;

/// Upper bound for any tick-counted threshold (one day at 1 ms ticks).
pub const TICK_THRESHOLD_MAX: u32 = 86_400_000;

/// Default lamp/buzzer blink period while opening [ms].
pub const OPENING_BLINK_MS_DEFAULT: u32 = 500;

/// Default lamp/buzzer blink period while closing [ms].
pub const CLOSING_BLINK_MS_DEFAULT: u32 = 250;

/// Default lamp blink period while in `Error` [ms]. Zero disables the blink.
pub const ERROR_BLINK_MS_DEFAULT: u32 = 300;

/// Default simulated full-travel time [ticks].
pub const SIM_TRAVEL_TICKS_DEFAULT: u32 = 120;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config/gate.toml";

// A healthy simulated plant must finish its travel before the run timeout.
const_assert!(SIM_TRAVEL_TICKS_DEFAULT < RUN_TIMEOUT_TICKS_DEFAULT);
// Blink periods must span at least one tick.
const_assert!(CLOSING_BLINK_MS_DEFAULT >= TICK_PERIOD_MS);
const_assert!(OPENING_BLINK_MS_DEFAULT >= TICK_PERIOD_MS);
const_assert!(ERROR_BLINK_MS_DEFAULT >= TICK_PERIOD_MS);
