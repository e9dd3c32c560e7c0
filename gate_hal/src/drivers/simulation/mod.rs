//! Simulation driver module.
//!
//! This module provides a software gate plant and a scripted operator for
//! development and testing without physical hardware.

mod driver;
mod plant;
mod script;

pub use driver::SimulationDriver;
pub use plant::{GatePlant, PlantFault, PlantFaults};
pub use script::{Button, OperatorScript, ScriptAction, ScriptCursor, ScriptStep};

use gate_common::hal::config::SimulationConfig;
use gate_common::hal::driver::{GateDriver, HalError};

/// Factory function to create a boxed simulation driver.
///
/// Rejects a plant that cannot move or that starts outside its travel.
pub fn create_driver(
    config: &SimulationConfig,
    script: OperatorScript,
) -> Result<Box<dyn GateDriver>, HalError> {
    if config.travel_ticks == 0 {
        return Err(HalError::ConfigError(
            "travel_ticks must be at least 1".to_string(),
        ));
    }
    if config.initial_position > config.travel_ticks {
        return Err(HalError::ConfigError(format!(
            "initial_position {} beyond travel_ticks {}",
            config.initial_position, config.travel_ticks
        )));
    }
    Ok(Box::new(SimulationDriver::with_script(config, script)))
}
