//! Platform abstraction layer
//!
//! Translates browser input events into simulation commands. Event listener
//! wiring lives in the binary; the mapping here is platform-independent.

pub mod input;

pub use input::{LaneInput, apply_input, tap_lane};
