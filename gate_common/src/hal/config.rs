//! Simulation backend configuration.
//!
//! Describes the software gate plant driven by the simulation driver:
//! how long a full travel takes and where the leaf starts.

use serde::{Deserialize, Serialize};

use crate::consts::SIM_TRAVEL_TICKS_DEFAULT;

/// Simulated gate plant parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Ticks of motor run needed to move from fully closed to fully open.
    #[serde(default = "default_travel_ticks")]
    pub travel_ticks: u32,

    /// Leaf position at startup, 0 = closed, `travel_ticks` = open.
    #[serde(default)]
    pub initial_position: u32,
}

fn default_travel_ticks() -> u32 {
    SIM_TRAVEL_TICKS_DEFAULT
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            travel_ticks: SIM_TRAVEL_TICKS_DEFAULT,
            initial_position: 0,
        }
    }
}

impl SimulationConfig {
    /// Validate the plant against the controller's run timeout.
    pub fn validate(&self, run_timeout_ticks: u32) -> Result<(), String> {
        if self.travel_ticks == 0 {
            return Err("travel_ticks must be at least 1".to_string());
        }
        if self.travel_ticks >= run_timeout_ticks {
            return Err(format!(
                "travel_ticks {} must be shorter than run_timeout_ticks {}",
                self.travel_ticks, run_timeout_ticks
            ));
        }
        if self.initial_position > self.travel_ticks {
            return Err(format!(
                "initial_position {} beyond travel_ticks {}",
                self.initial_position, self.travel_ticks
            ));
        }
        Ok(())
    }
}
