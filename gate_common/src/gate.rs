//! Gate controller shared types.
//!
//! Everything exchanged between the control unit and its collaborators:
//! state and error enums, the per-tick input snapshot and output actuation,
//! and the immutable controller configuration.

pub mod config;
pub mod io;
pub mod state;
