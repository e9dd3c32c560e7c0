//! Scripted operator for the simulation driver.
//!
//! A script is a TOML list of timed actions:
//!
//! ```toml
//! [[step]]
//! tick = 5
//! action = "tap"
//! button = "open"
//!
//! [[step]]
//! tick = 60
//! action = "remote"
//! command = "stop"
//!
//! [[step]]
//! tick = 80
//! action = "fault"
//! fault = "motor_stuck"
//! ```
//!
//! Ticks count read cycles from 0. Steps sharing a tick apply in file order.

use std::path::Path;

use gate_common::config::{ConfigError, ConfigLoader};
use gate_common::gate::io::{InputBits, RemoteCommand};
use serde::{Deserialize, Serialize};

use super::plant::PlantFault;

/// Operator button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Open,
    Close,
    Emergency,
    Toggle,
    Reset,
    Stop,
}

impl Button {
    /// Input bit driven by this button.
    pub const fn bit(self) -> InputBits {
        match self {
            Self::Open => InputBits::BUTTON_OPEN,
            Self::Close => InputBits::BUTTON_CLOSE,
            Self::Emergency => InputBits::BUTTON_EMERGENCY,
            Self::Toggle => InputBits::BUTTON_TOGGLE,
            Self::Reset => InputBits::BUTTON_RESET,
            Self::Stop => InputBits::BUTTON_STOP,
        }
    }
}

/// One operator or environment action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Hold a button down until released.
    Press { button: Button },
    /// Let go of a held button.
    Release { button: Button },
    /// Press for exactly one tick.
    Tap { button: Button },
    /// Deliver a remote command on this tick.
    Remote { command: RemoteCommand },
    /// Inject a plant fault.
    Fault { fault: PlantFault },
    /// Remove every plant fault.
    ClearFaults,
}

/// Action scheduled at a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub tick: u64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// Ordered list of timed actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorScript {
    #[serde(default, rename = "step")]
    steps: Vec<ScriptStep>,
}

impl OperatorScript {
    /// Build from steps; order by tick, keeping file order within a tick.
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|s| s.tick);
        Self { steps }
    }

    /// Load a script file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw: Self = Self::load(path)?;
        Ok(Self::new(raw.steps))
    }

    /// Parse a script document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: Self = Self::load_str(content)?;
        Ok(Self::new(raw.steps))
    }

    #[inline]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Tick of the last scheduled action.
    pub fn last_tick(&self) -> Option<u64> {
        self.steps.last().map(|s| s.tick)
    }
}

/// Iterates the script in tick order.
#[derive(Debug, Clone)]
pub struct ScriptCursor {
    script: OperatorScript,
    next: usize,
}

impl ScriptCursor {
    pub fn new(script: OperatorScript) -> Self {
        Self { script, next: 0 }
    }

    /// Actions due at or before `tick` that have not been taken yet.
    pub fn due(&mut self, tick: u64) -> &[ScriptStep] {
        let start = self.next;
        while self
            .script
            .steps
            .get(self.next)
            .is_some_and(|s| s.tick <= tick)
        {
            self.next += 1;
        }
        &self.script.steps[start..self.next]
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.next >= self.script.steps.len()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
