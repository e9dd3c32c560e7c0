//! # Gate HAL Library
//!
//! I/O backends for the gate control unit. Drivers implement the
//! `GateDriver` trait defined in `gate_common::hal::driver`.
//!
//! # Module Structure
//!
//! - [`drivers`] - Driver implementations
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐   read_inputs()    ┌──────────────────────────┐
//! │   CycleRunner     │◄──────────────────│  GateDriver              │
//! │ (gate_control_unit)│  write_outputs()  │  ├─ SimulationDriver     │
//! │                   │──────────────────►│  │   ├─ GatePlant        │
//! └───────────────────┘                   │  │   └─ OperatorScript   │
//!                                         └──────────────────────────┘
//! ```

pub mod drivers;

pub use crate::drivers::simulation::{OperatorScript, SimulationDriver};
