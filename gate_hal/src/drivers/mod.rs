//! Gate driver implementations.
//!
//! - [`simulation`] - Software gate plant for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `GateDriver` trait from `gate_common::hal::driver`
//! 3. Add export and documentation

pub mod simulation;
