//! Safety module root.
//!
//! Tick-level overrides (limit switch conflict, emergency) and the exit
//! conditions of the latched `Error` and `Emergency` states.

pub mod fault;
pub mod recovery;
