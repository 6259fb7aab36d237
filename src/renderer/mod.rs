//! Rendering module
//!
//! `frame` builds plain triangle lists from the simulation; `pipeline` draws
//! them through WebGPU.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::{FrameOptions, build_frame};
pub use pipeline::RenderState;
pub use vertex::Vertex;

use crate::sim::SimulationState;
use crate::theme::TrackTheme;

/// Somewhere a simulation frame can be shown
pub trait FrameSink {
    fn present(&mut self, state: &SimulationState, theme: &TrackTheme);
}
