//! Stateful controller facade over the pure step function.
//!
//! Owns the retained state and configuration, applies one snapshot per
//! tick, logs transitions and keeps running diagnostics counters.

use gate_common::gate::config::GateConfig;
use gate_common::gate::io::{InputSnapshot, OutputActuation};
use gate_common::gate::state::{ErrorCode, GateState};
use tracing::{info, warn};

use crate::state::machine::{ControllerState, StepResult, Transition, TransitionCause, step};

/// Running counters since power-on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Ticks evaluated.
    pub ticks: u64,
    /// State changes taken.
    pub transitions: u64,
    /// Run timeouts latched.
    pub timeouts: u64,
    /// Limit switch conflicts latched.
    pub sensor_conflicts: u64,
    /// Emergency entries.
    pub emergencies: u64,
    /// Most recent transition and the tick it happened on.
    pub last_transition: Option<(u64, Transition)>,
}

impl Diagnostics {
    fn record(&mut self, transition: &Transition) {
        self.transitions += 1;
        match transition.to {
            GateState::Error => match transition.cause {
                TransitionCause::RunTimeout => self.timeouts += 1,
                TransitionCause::SensorConflict => self.sensor_conflicts += 1,
                _ => {}
            },
            GateState::Emergency => self.emergencies += 1,
            _ => {}
        }
        self.last_transition = Some((self.ticks, *transition));
    }
}

/// Gate controller: configuration, retained state and diagnostics.
#[derive(Debug, Clone)]
pub struct GateController {
    config: GateConfig,
    state: ControllerState,
    last_output: OutputActuation,
    diagnostics: Diagnostics,
}

impl GateController {
    /// Create a controller in `Initial`.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            state: ControllerState::new(),
            last_output: OutputActuation::OFF,
            diagnostics: Diagnostics::default(),
        }
    }

    /// Evaluate one tick and return the actuation to apply.
    pub fn step(&mut self, input: &InputSnapshot) -> OutputActuation {
        let StepResult {
            next,
            output,
            transition,
        } = step(&self.config, &self.state, input);

        self.diagnostics.ticks += 1;
        if let Some(t) = transition {
            log_transition(self.diagnostics.ticks, &t, next.error);
            self.diagnostics.record(&t);
        }

        self.state = next;
        self.last_output = output;
        output
    }

    #[inline]
    pub const fn state(&self) -> GateState {
        self.state.state
    }

    #[inline]
    pub const fn error(&self) -> ErrorCode {
        self.state.error
    }

    #[inline]
    pub const fn config(&self) -> &GateConfig {
        &self.config
    }

    #[inline]
    pub const fn last_output(&self) -> OutputActuation {
        self.last_output
    }

    #[inline]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

fn log_transition(tick: u64, t: &Transition, error: ErrorCode) {
    let cause = format_cause(&t.cause);
    if t.to.is_alarm() {
        warn!(tick, from = %t.from, to = %t.to, %error, cause, "gate state change");
    } else {
        info!(tick, from = %t.from, to = %t.to, cause, "gate state change");
    }
}

fn format_cause(cause: &TransitionCause) -> &'static str {
    use crate::command::arbitration::{CommandOrigin, GateCommand};

    match cause {
        TransitionCause::SensorConflict => "limit switch conflict",
        TransitionCause::Emergency(CommandOrigin::Local) => "emergency button",
        TransitionCause::Emergency(CommandOrigin::Remote) => "remote emergency",
        TransitionCause::PositionEvaluated => "position evaluated",
        TransitionCause::LimitReached => "limit reached",
        TransitionCause::Command(sel) => match (sel.command, sel.origin) {
            (GateCommand::Open, CommandOrigin::Local) => "open button",
            (GateCommand::Close, CommandOrigin::Local) => "close button",
            (GateCommand::Toggle, _) => "toggle button",
            (GateCommand::Reset, CommandOrigin::Local) => "reset button",
            (GateCommand::Stop, CommandOrigin::Local) => "stop button",
            (GateCommand::Open, CommandOrigin::Remote) => "remote open",
            (GateCommand::Close, CommandOrigin::Remote) => "remote close",
            (GateCommand::Stop, CommandOrigin::Remote) => "remote stop",
            (GateCommand::Reset, CommandOrigin::Remote) => "remote reset",
        },
        TransitionCause::RunTimeout => "run timeout",
        TransitionCause::DwellExpired => "open dwell expired",
        TransitionCause::SensorsRecovered => "limit switches recovered",
        TransitionCause::TimeoutRecovery => "timeout recovery",
        TransitionCause::EmergencyReset(CommandOrigin::Local) => "emergency reset",
        TransitionCause::EmergencyReset(CommandOrigin::Remote) => "remote emergency reset",
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
