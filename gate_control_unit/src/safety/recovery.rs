//! Exit conditions of the latched `Error` and `Emergency` states.
//!
//! `SensorConflict` is never cleared by the controller on its own: it waits
//! for the sensors to read consistently again. `Timeout` is recovered
//! locally by driving the gate closed on the next tick. `Emergency` needs
//! the panic input released and an explicit reset.

use gate_common::gate::io::InputSnapshot;
use gate_common::gate::state::{ErrorCode, GateState};

use crate::command::arbitration::{CommandFrame, CommandOrigin};

/// Decision taken while in `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStep {
    /// Stay latched with this code.
    Hold(ErrorCode),
    /// Sensors consistent again; re-evaluate the position from `Initial`.
    Reevaluate,
    /// Run timeout recovery attempt toward this state.
    Recover(GateState),
}

/// Evaluate one tick in `Error`.
pub fn step_error(code: ErrorCode, input: &InputSnapshot) -> ErrorStep {
    if input.sensor_conflict() {
        return ErrorStep::Hold(ErrorCode::SensorConflict);
    }
    match code {
        ErrorCode::SensorConflict => {
            if input.position_consistent() {
                ErrorStep::Reevaluate
            } else {
                ErrorStep::Hold(ErrorCode::SensorConflict)
            }
        }
        // Never drive the motor while the panic input is held.
        ErrorCode::Timeout if input.emergency_requested() => {
            ErrorStep::Recover(GateState::Emergency)
        }
        ErrorCode::Timeout => ErrorStep::Recover(GateState::Closing),
        ErrorCode::Ok => ErrorStep::Reevaluate,
    }
}

/// Emergency release: panic input released and a reset observed in the same tick.
///
/// Returns the origin of the reset that released the latch.
pub fn emergency_release(input: &InputSnapshot, frame: &CommandFrame) -> Option<CommandOrigin> {
    if input.emergency_requested() {
        return None;
    }
    if frame.edges().reset {
        Some(CommandOrigin::Local)
    } else if frame.reset_requested() {
        Some(CommandOrigin::Remote)
    } else {
        None
    }
}
