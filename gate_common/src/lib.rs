//! Gate Common Library
//!
//! Shared constants, value types and configuration loading utilities for all
//! gate controller workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Default timing values and parameter bounds
//! - [`config`] - Configuration loading traits and types
//! - [`gate`] - Gate state, error code, I/O snapshot and controller config
//! - [`hal`] - Driver trait and simulation configuration
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use gate_common::prelude::*;
//!
//! let input = InputSnapshot {
//!     limit_closed: true,
//!     ..InputSnapshot::default()
//! };
//! assert!(!input.sensor_conflict());
//! assert_eq!(GateState::default(), GateState::Initial);
//! ```

pub mod config;
pub mod consts;
pub mod gate;
pub mod hal;
pub mod prelude;
