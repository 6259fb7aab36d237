//! Turbo Racer - A three-lane arcade dodging racer
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (player easing, speed ramp, obstacles, scoring)
//! - `renderer`: Frame geometry and WebGPU pipeline
//! - `platform`: Browser input mapping
//! - `shell`: Menu / playing / game-over state machine
//! - `commentary`: Generated-text commentator boundary
//! - `theme`: Track presets

pub mod commentary;
pub mod hud;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod shell;
pub mod sim;
pub mod theme;

pub use settings::Settings;
pub use shell::{Screen, Shell};
pub use theme::{THEMES, TrackTheme};

/// Game configuration constants
pub mod consts {
    /// Logical drawing surface size
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Track is split into this many equal lanes
    pub const LANE_COUNT: usize = 3;
    pub const LANE_WIDTH: f32 = CANVAS_WIDTH / LANE_COUNT as f32;
    /// Lane the player starts in
    pub const START_LANE: usize = 1;

    /// Player car footprint
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    /// Gap between the player's rear bumper and the bottom of the track
    pub const PLAYER_BOTTOM_MARGIN: f32 = 50.0;
    /// Fraction of the remaining distance to the target covered each frame
    pub const PLAYER_EASING: f32 = 0.15;

    /// Obstacle footprint
    pub const OBSTACLE_WIDTH: f32 = 55.0;
    pub const OBSTACLE_HEIGHT: f32 = 90.0;
    /// Obstacle fall rate relative to the global speed at spawn time
    pub const OBSTACLE_SPEED_FACTOR: f32 = 0.7;
    /// Chance a spawned obstacle is drawn as a barrier
    pub const BARRIER_CHANCE: f64 = 0.2;

    /// Speed ramp (units per frame)
    pub const INITIAL_SPEED: f32 = 5.0;
    pub const SPEED_INCREMENT: f32 = 0.001;
    pub const MAX_SPEED: f32 = 15.0;

    /// Frames per second assumed when integrating distance
    pub const NOMINAL_FPS: f32 = 60.0;

    /// Spawn cadence: `max(SPAWN_MIN_FRAMES, SPAWN_BASE_FRAMES - floor(speed * SPAWN_SPEED_FACTOR))`
    pub const SPAWN_BASE_FRAMES: u64 = 90;
    pub const SPAWN_SPEED_FACTOR: f32 = 3.0;
    pub const SPAWN_MIN_FRAMES: u64 = 30;

    /// Inward shrink applied to both rectangles before the overlap test
    pub const COLLISION_BUFFER: f32 = 5.0;

    /// Scoring
    pub const SCORE_PER_DISTANCE: f32 = 10.0;
    pub const NEAR_MISS_BONUS: u64 = 50;

    /// Distance between MILESTONE events
    pub const MILESTONE_DISTANCE: f32 = 500.0;
}

use consts::{LANE_COUNT, LANE_WIDTH};

/// Left edge that centers an object of `width` in `lane`
#[inline]
pub fn lane_x(lane: usize, width: f32) -> f32 {
    lane as f32 * LANE_WIDTH + (LANE_WIDTH - width) / 2.0
}

/// Clamp a lane index into the valid range
#[inline]
pub fn clamp_lane(lane: usize) -> usize {
    lane.min(LANE_COUNT - 1)
}
