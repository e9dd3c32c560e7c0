//! Gate state machine: one pure evaluation per tick.
//!
//! `step` consumes the retained [`ControllerState`] and one
//! [`InputSnapshot`], and returns the next retained state, a complete
//! output vector, and the transition taken (if any). It never blocks and
//! never touches anything outside its arguments.
//!
//! Evaluation order: edge detection → limit switch conflict → emergency →
//! per-state rules (local edges, remote command, dwell/run timeouts) →
//! outputs for the resulting state.

use gate_common::gate::config::GateConfig;
use gate_common::gate::io::{InputSnapshot, OutputActuation};
use gate_common::gate::state::{ErrorCode, GateState};

use crate::command::arbitration::{Arbitrated, CommandFrame, CommandOrigin, GateCommand};
use crate::command::edge::EdgeTracker;
use crate::safety::fault::{Override, evaluate_overrides};
use crate::safety::recovery::{ErrorStep, emergency_release, step_error};
use crate::timer::Timers;
use crate::timer::timeout::TimeoutCounter;

use super::output::compute_output;

/// Everything the controller retains between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub state: GateState,
    pub error: ErrorCode,
    pub timers: Timers,
    pub edges: EdgeTracker,
}

impl ControllerState {
    /// Power-on state: `Initial`, no error, timers cleared.
    pub const fn new() -> Self {
        Self {
            state: GateState::Initial,
            error: ErrorCode::Ok,
            timers: Timers::new(),
            edges: EdgeTracker::new(),
        }
    }

    /// Freshly entered `state` with cleared timers and no error.
    pub const fn entered(state: GateState) -> Self {
        Self {
            state,
            ..Self::new()
        }
    }

    /// Freshly latched `Error` with `code`.
    pub const fn faulted(code: ErrorCode) -> Self {
        Self {
            state: GateState::Error,
            error: code,
            ..Self::new()
        }
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    /// Both limit switches asserted.
    SensorConflict,
    /// Panic input or remote emergency.
    Emergency(CommandOrigin),
    /// `Initial` resolved the position from the limit switches.
    PositionEvaluated,
    /// The target limit switch of a travel was reached.
    LimitReached,
    /// An operator command won arbitration.
    Command(Arbitrated),
    /// Travel exceeded `run_timeout_ticks`.
    RunTimeout,
    /// Open dwell exceeded `open_dwell_ticks`.
    DwellExpired,
    /// Limit switches consistent again after a conflict.
    SensorsRecovered,
    /// Automatic recovery after a run timeout.
    TimeoutRecovery,
    /// Emergency released and reset.
    EmergencyReset(CommandOrigin),
}

/// A state change observed during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GateState,
    pub to: GateState,
    pub cause: TransitionCause,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Retained state for the next tick.
    pub next: ControllerState,
    /// Actuation to apply for this tick.
    pub output: OutputActuation,
    /// Transition taken this tick, if any.
    pub transition: Option<Transition>,
}

/// Result of evaluating the rules of one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Stay,
    /// Stay, replacing the error code (only used in `Error`).
    Hold(ErrorCode),
    Go {
        to: GateState,
        error: ErrorCode,
        cause: TransitionCause,
    },
}

impl Decision {
    const fn go(to: GateState, cause: TransitionCause) -> Self {
        Self::Go {
            to,
            error: ErrorCode::Ok,
            cause,
        }
    }

    const fn fault(code: ErrorCode, cause: TransitionCause) -> Self {
        Self::Go {
            to: GateState::Error,
            error: code,
            cause,
        }
    }
}

/// Evaluate one tick.
pub fn step(config: &GateConfig, current: &ControllerState, input: &InputSnapshot) -> StepResult {
    let mut next = *current;
    let edges = next.edges.update(input);
    let frame = CommandFrame::new(edges, input);

    let decision = match evaluate_overrides(current.state, input, &frame) {
        Some(Override::SensorConflict) => {
            Decision::fault(ErrorCode::SensorConflict, TransitionCause::SensorConflict)
        }
        Some(Override::Emergency(origin)) => {
            Decision::go(GateState::Emergency, TransitionCause::Emergency(origin))
        }
        None => evaluate_state(config, current, &mut next.timers.elapsed, input, &frame),
    };

    let mut transition = None;
    match decision {
        Decision::Stay => {}
        Decision::Hold(code) => next.error = code,
        Decision::Go { to, error, cause } => {
            next.error = error;
            if to != current.state {
                next.state = to;
                next.timers.enter_state();
                transition = Some(Transition {
                    from: current.state,
                    to,
                    cause,
                });
            }
        }
    }

    let output = compute_output(
        config,
        next.state,
        &mut next.timers.blink,
        transition.is_some(),
    );

    StepResult {
        next,
        output,
        transition,
    }
}

fn evaluate_state(
    config: &GateConfig,
    current: &ControllerState,
    elapsed: &mut TimeoutCounter,
    input: &InputSnapshot,
    frame: &CommandFrame,
) -> Decision {
    match current.state {
        GateState::Initial => evaluate_initial(input),
        GateState::Closing => evaluate_travel(
            input.limit_closed,
            GateState::Closed,
            config.run_timeout_ticks,
            elapsed,
            frame,
        ),
        GateState::Opening => evaluate_travel(
            input.limit_open,
            GateState::Open,
            config.run_timeout_ticks,
            elapsed,
            frame,
        ),
        GateState::Closed => evaluate_closed(frame),
        GateState::Open => evaluate_open(config.open_dwell_ticks, elapsed, frame),
        GateState::Stopped => evaluate_stopped(input, frame),
        GateState::Error => evaluate_error(current.error, input),
        GateState::Emergency => evaluate_emergency(input, frame),
    }
}

fn evaluate_initial(input: &InputSnapshot) -> Decision {
    match (input.limit_closed, input.limit_open) {
        (true, true) => Decision::fault(ErrorCode::SensorConflict, TransitionCause::SensorConflict),
        (true, false) => Decision::go(GateState::Closed, TransitionCause::PositionEvaluated),
        // Found open: the safe default is to close.
        (false, true) => Decision::go(GateState::Closing, TransitionCause::PositionEvaluated),
        (false, false) => Decision::go(GateState::Stopped, TransitionCause::PositionEvaluated),
    }
}

/// `Opening` and `Closing`: limit reached, manual abort, or run timeout.
fn evaluate_travel(
    target_limit: bool,
    target: GateState,
    run_timeout_ticks: u32,
    elapsed: &mut TimeoutCounter,
    frame: &CommandFrame,
) -> Decision {
    if target_limit {
        return Decision::go(target, TransitionCause::LimitReached);
    }

    let abort = frame.select(|cmd, origin| match origin {
        CommandOrigin::Local => matches!(
            cmd,
            GateCommand::Open | GateCommand::Close | GateCommand::Toggle | GateCommand::Stop
        ),
        CommandOrigin::Remote => matches!(
            cmd,
            GateCommand::Open | GateCommand::Close | GateCommand::Stop
        ),
    });
    if let Some(sel) = abort {
        return Decision::go(GateState::Stopped, TransitionCause::Command(sel));
    }

    elapsed.advance();
    if elapsed.exceeded(run_timeout_ticks) {
        return Decision::fault(ErrorCode::Timeout, TransitionCause::RunTimeout);
    }
    Decision::Stay
}

fn evaluate_closed(frame: &CommandFrame) -> Decision {
    frame
        .select(|cmd, _| matches!(cmd, GateCommand::Open | GateCommand::Toggle))
        .map_or(Decision::Stay, |sel| {
            Decision::go(GateState::Opening, TransitionCause::Command(sel))
        })
}

fn evaluate_open(open_dwell_ticks: u32, elapsed: &mut TimeoutCounter, frame: &CommandFrame) -> Decision {
    let command = frame.select(|cmd, _| {
        matches!(
            cmd,
            GateCommand::Close | GateCommand::Toggle | GateCommand::Stop
        )
    });
    if let Some(sel) = command {
        let to = if sel.command == GateCommand::Stop {
            GateState::Stopped
        } else {
            GateState::Closing
        };
        return Decision::go(to, TransitionCause::Command(sel));
    }

    elapsed.advance();
    if elapsed.exceeded(open_dwell_ticks) {
        return Decision::go(GateState::Closing, TransitionCause::DwellExpired);
    }
    Decision::Stay
}

/// Push-push target from an unknown or resting position: away from the
/// asserted limit, closing when neither is asserted.
fn toggle_target(input: &InputSnapshot) -> GateState {
    if input.limit_open {
        GateState::Closing
    } else if input.limit_closed {
        GateState::Opening
    } else {
        GateState::Closing
    }
}

fn stopped_target(cmd: GateCommand, input: &InputSnapshot) -> Option<GateState> {
    match cmd {
        GateCommand::Open => Some(GateState::Opening),
        GateCommand::Close => Some(GateState::Closing),
        GateCommand::Toggle => Some(toggle_target(input)),
        GateCommand::Reset => Some(GateState::Initial),
        GateCommand::Stop => None,
    }
}

fn evaluate_stopped(input: &InputSnapshot, frame: &CommandFrame) -> Decision {
    let accepted = frame.select(|cmd, origin| {
        // Local open/close are interlocked against the limit already reached.
        let interlocked = origin == CommandOrigin::Local
            && match cmd {
                GateCommand::Open => input.limit_open,
                GateCommand::Close => input.limit_closed,
                _ => false,
            };
        !interlocked && stopped_target(cmd, input).is_some()
    });

    match accepted.and_then(|sel| stopped_target(sel.command, input).map(|to| (sel, to))) {
        Some((sel, to)) => Decision::go(to, TransitionCause::Command(sel)),
        None => Decision::Stay,
    }
}

fn evaluate_error(code: ErrorCode, input: &InputSnapshot) -> Decision {
    match step_error(code, input) {
        ErrorStep::Hold(code) => Decision::Hold(code),
        ErrorStep::Reevaluate => Decision::go(GateState::Initial, TransitionCause::SensorsRecovered),
        ErrorStep::Recover(to) => Decision::go(to, TransitionCause::TimeoutRecovery),
    }
}

fn evaluate_emergency(input: &InputSnapshot, frame: &CommandFrame) -> Decision {
    emergency_release(input, frame).map_or(Decision::Stay, |origin| {
        Decision::go(GateState::Initial, TransitionCause::EmergencyReset(origin))
    })
}

// ─── Tests ──────────────────────────────────────────────────────────
