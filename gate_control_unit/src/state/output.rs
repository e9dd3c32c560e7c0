//! Output actuation per state.
//!
//! Outputs are rebuilt from scratch every tick from the resulting state and
//! the blink phase, never patched incrementally. The direction interlock is
//! applied last.

use gate_common::gate::config::GateConfig;
use gate_common::gate::io::OutputActuation;
use gate_common::gate::state::GateState;

use crate::timer::blink::BlinkScheduler;

/// Compute the actuation for `state`.
///
/// `entered` is true on the tick the state was entered; the blink scheduler
/// has just been reset and is not advanced on that tick.
pub fn compute_output(
    config: &GateConfig,
    state: GateState,
    blink: &mut BlinkScheduler,
    entered: bool,
) -> OutputActuation {
    let phase = match config.blink_period_ms(state) {
        Some(period) if !entered => blink.advance(config.tick_period_ms, period),
        _ => blink.phase(),
    };

    let output = match state {
        GateState::Initial | GateState::Closed | GateState::Stopped => OutputActuation::OFF,
        GateState::Opening => OutputActuation {
            motor_open: true,
            motor_close: false,
            buzzer: phase,
            lamp: phase,
        },
        GateState::Closing => OutputActuation {
            motor_open: false,
            motor_close: true,
            buzzer: phase,
            lamp: phase,
        },
        GateState::Open => OutputActuation {
            lamp: true,
            ..OutputActuation::OFF
        },
        GateState::Error => OutputActuation {
            buzzer: true,
            lamp: phase,
            ..OutputActuation::OFF
        },
        GateState::Emergency => OutputActuation {
            buzzer: true,
            lamp: true,
            ..OutputActuation::OFF
        },
    };

    output.interlocked()
}
