//! Command processing root.
//!
//! Rising-edge detection of operator buttons and per-tick arbitration of
//! local buttons, the remote channel and the emergency input.

pub mod arbitration;
pub mod edge;
