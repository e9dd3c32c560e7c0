//! Gate state and error code enums.
//!
//! Both enums use `#[repr(u8)]` so they can travel as a single status byte
//! to telemetry or a panel display.

use serde::{Deserialize, Serialize};

/// Gate controller state.
///
/// Exactly one state is active at any tick. The controller starts in
/// `Initial` and only its own transition logic changes the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GateState {
    /// Position unknown; evaluated from the limit switches on the next tick.
    #[default]
    Initial = 0,
    /// Leaf resting on the closed limit switch.
    Closed = 1,
    /// Motor driving toward the open limit.
    Opening = 2,
    /// Leaf resting on the open limit switch, dwell timer running.
    Open = 3,
    /// Motor driving toward the closed limit.
    Closing = 4,
    /// Motor idle at an arbitrary position, awaiting an operator command.
    Stopped = 5,
    /// Fault latched; see the accompanying [`ErrorCode`].
    Error = 6,
    /// Panic input latched; requires release plus reset.
    Emergency = 7,
}

impl GateState {
    /// All states in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::Initial,
        Self::Closed,
        Self::Opening,
        Self::Open,
        Self::Closing,
        Self::Stopped,
        Self::Error,
        Self::Emergency,
    ];

    /// True for the latched alarm states that assert the buzzer continuously.
    #[inline]
    pub const fn is_alarm(self) -> bool {
        matches!(self, Self::Error | Self::Emergency)
    }

    /// Short upper-case label used in logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Closed => "CLOSED",
            Self::Opening => "OPENING",
            Self::Open => "OPEN",
            Self::Closing => "CLOSING",
            Self::Stopped => "STOPPED",
            Self::Error => "ERROR",
            Self::Emergency => "EMERGENCY",
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fault code carried alongside `GateState::Error`.
///
/// Invariant: anything other than `Ok` implies the state is `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ErrorCode {
    /// No fault.
    #[default]
    Ok = 0,
    /// Motor ran longer than `run_timeout_ticks` without reaching its limit switch.
    Timeout = 1,
    /// Both limit switches asserted at once.
    SensorConflict = 2,
}

impl ErrorCode {
    #[inline]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => f.write_str("ok"),
            Self::Timeout => f.write_str("run timeout"),
            Self::SensorConflict => f.write_str("limit switch conflict"),
        }
    }
}
