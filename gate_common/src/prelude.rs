//! Common re-exports for convenience.
//!
//! ```rust
//! use gate_common::prelude::*;
//! ```

pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::gate::config::GateConfig;
pub use crate::gate::io::{InputBits, InputSnapshot, OutputActuation, RemoteCommand};
pub use crate::gate::state::{ErrorCode, GateState};
pub use crate::hal::config::SimulationConfig;
pub use crate::hal::driver::{GateDriver, HalError};
