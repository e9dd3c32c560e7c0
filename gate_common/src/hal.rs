//! Hardware abstraction types.
//!
//! The driver trait every I/O backend implements and the configuration of
//! the simulation backend.

pub mod config;
pub mod driver;
