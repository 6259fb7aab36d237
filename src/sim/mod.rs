//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module draws, reads the DOM
//! or talks to the network:
//! - One `tick` per animation frame
//! - Seeded RNG only
//! - State is owned by the caller and passed in by reference

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, is_near_miss};
pub use state::{
    GameEvent, GameStats, Obstacle, ObstacleKind, PlayerCar, RunPhase, SimulationState,
};
pub use tick::{FrameOutcome, spawn_obstacle, spawn_rate, tick};
