//! TOML configuration loader with validation.
//!
//! Loads `ControlUnitConfig` (`[shared]`, `[gate]`, `[simulation]`) from a
//! single file and validates parameter bounds before the cycle starts.

use std::path::Path;

use gate_common::config::{ConfigError as CommonConfigError, ConfigLoader, SharedConfig};
use gate_common::gate::config::GateConfig;
use gate_common::hal::config::SimulationConfig;
use serde::{Deserialize, Serialize};

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error.
    IoError(String),
    /// TOML parse error.
    ParseError(String),
    /// Parameter validation error.
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "config I/O error: {e}"),
            Self::ParseError(e) => write!(f, "config parse error: {e}"),
            Self::ValidationError(e) => write!(f, "config validation: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<CommonConfigError> for ConfigError {
    fn from(e: CommonConfigError) -> Self {
        match e {
            CommonConfigError::FileNotFound(path) => Self::IoError(format!("not found: {path}")),
            CommonConfigError::ParseError(msg) => Self::ParseError(msg),
            CommonConfigError::ValidationError(msg) => Self::ValidationError(msg),
        }
    }
}

// ─── Control Unit Config ────────────────────────────────────────────

/// Complete control unit configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlUnitConfig {
    pub shared: SharedConfig,
    pub gate: GateConfig,
    pub simulation: SimulationConfig,
}

impl ControlUnitConfig {
    /// Run all validation rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.gate
            .validate()
            .map_err(|e| ConfigError::ValidationError(format!("[gate] {e}")))?;
        self.simulation
            .validate(self.gate.run_timeout_ticks)
            .map_err(|e| ConfigError::ValidationError(format!("[simulation] {e}")))?;
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the control unit configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ControlUnitConfig, ConfigError> {
    let config = ControlUnitConfig::load(path)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(content: &str) -> Result<ControlUnitConfig, ConfigError> {
    let config = ControlUnitConfig::load_str(content)?;
    config.validate()?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
