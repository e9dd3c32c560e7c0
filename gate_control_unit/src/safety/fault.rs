//! Overrides evaluated before any state rule.
//!
//! Priority: a limit switch conflict beats an emergency request, and both
//! beat every state-specific transition. Neither override applies while the
//! gate is already in `Error`; the error state handles its own exit.

use gate_common::gate::io::InputSnapshot;
use gate_common::gate::state::GateState;

use crate::command::arbitration::{CommandFrame, CommandOrigin};

/// An override that pre-empts the state rules this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Override {
    /// Both limit switches asserted.
    SensorConflict,
    /// Panic input or remote emergency.
    Emergency(CommandOrigin),
}

/// Evaluate the overrides for the current state and inputs.
pub fn evaluate_overrides(
    state: GateState,
    input: &InputSnapshot,
    frame: &CommandFrame,
) -> Option<Override> {
    if state == GateState::Error {
        return None;
    }
    if input.sensor_conflict() {
        return Some(Override::SensorConflict);
    }
    frame.emergency().map(Override::Emergency)
}
