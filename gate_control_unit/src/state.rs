//! State machine module root.
//!
//! The pure per-tick transition function and the output vector computed
//! for each state.

pub mod machine;
pub mod output;
