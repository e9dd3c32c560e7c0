//! # Gate Control Unit Library
//!
//! Tick-driven controller for a motorized gate. Every tick the cycle runner
//! samples one [`InputSnapshot`](gate_common::gate::io::InputSnapshot) from the
//! driver, runs the pure state machine step, and writes one complete
//! [`OutputActuation`](gate_common::gate::io::OutputActuation) back.
//!
//! ## Evaluation Order (per tick)
//!
//! 1. **Edge detection**: rising edges of the operator buttons
//! 2. **Fault override**: both limit switches → `Error`/`SensorConflict`
//! 3. **Emergency override**: panic input or remote emergency → `Emergency`
//! 4. **State rules**: local edges, then remote command, then dwell/run timeouts
//! 5. **Outputs**: recomputed from scratch for the resulting state
//!
//! ## No Blocking
//!
//! Nothing inside a step sleeps or polls. Multi-tick waits are tick counters
//! compared against [`GateConfig`](gate_common::gate::config::GateConfig)
//! thresholds, resumed on the next invocation.

pub mod command;
pub mod config;
pub mod controller;
pub mod cycle;
pub mod safety;
pub mod state;
pub mod timer;
