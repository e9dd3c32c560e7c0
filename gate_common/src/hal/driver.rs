//! Gate driver trait and error types.
//!
//! A driver is the I/O collaborator of the control unit: it samples the
//! sensors and buttons into an [`InputSnapshot`] and applies the
//! [`OutputActuation`] to the motor contactors, buzzer and lamp.

use thiserror::Error;

use crate::gate::io::{InputSnapshot, OutputActuation};

/// Error types for driver operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Hardware communication error.
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),
}

/// Interface every I/O backend implements (simulation, GPIO, ...).
///
/// # Lifecycle
///
/// 1. `read_inputs()` - once per tick, before the controller step
/// 2. `write_outputs()` - once per tick, after the controller step
/// 3. `shutdown()` - when the cycle runner stops
///
/// Both per-tick calls must finish well within the tick period and must not
/// block on the remote channel; remote commands are buffered by the driver
/// and delivered as a pre-decoded code in the snapshot.
pub trait GateDriver {
    /// Driver identifier (e.g. "simulation").
    fn name(&self) -> &'static str;

    /// Sample all inputs for the coming tick.
    fn read_inputs(&mut self) -> Result<InputSnapshot, HalError>;

    /// Apply the actuation computed for this tick.
    fn write_outputs(&mut self, output: &OutputActuation) -> Result<(), HalError>;

    /// De-energize outputs and release resources.
    fn shutdown(&mut self) -> Result<(), HalError> {
        self.write_outputs(&OutputActuation::OFF)
    }
}

impl<T: GateDriver + ?Sized> GateDriver for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read_inputs(&mut self) -> Result<InputSnapshot, HalError> {
        (**self).read_inputs()
    }

    fn write_outputs(&mut self, output: &OutputActuation) -> Result<(), HalError> {
        (**self).write_outputs(output)
    }

    fn shutdown(&mut self) -> Result<(), HalError> {
        (**self).shutdown()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
