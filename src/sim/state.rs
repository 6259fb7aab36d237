//! Game state and core simulation types
//!
//! A `SimulationState` exists only while a run is in progress and is replaced
//! wholesale when a new run starts.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::theme::Color;
use crate::{clamp_lane, lane_x};

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Loop is scheduled and mutating state every frame
    Running,
    /// A collision ended the run; stats are frozen
    Terminated,
}

/// Discrete gameplay events forwarded to the commentator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    #[serde(rename = "START")]
    Start,
    #[serde(rename = "SPEEDUP")]
    SpeedUp,
    #[serde(rename = "NEAR_MISS")]
    NearMiss,
    #[serde(rename = "CRASH")]
    Crash,
    #[serde(rename = "MILESTONE")]
    Milestone,
}

impl GameEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::Start => "START",
            GameEvent::SpeedUp => "SPEEDUP",
            GameEvent::NearMiss => "NEAR_MISS",
            GameEvent::Crash => "CRASH",
            GameEvent::Milestone => "MILESTONE",
        }
    }
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCar {
    pub x: f32,
    /// Fixed after placement
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Stored only
    pub speed: f32,
    /// Lane-centered x the car eases toward
    pub target_x: f32,
}

impl Default for PlayerCar {
    fn default() -> Self {
        let x = lane_x(START_LANE, PLAYER_WIDTH);
        Self {
            x,
            y: CANVAS_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: 0.0,
            target_x: x,
        }
    }
}

impl PlayerCar {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Exponential approach toward `target_x`; never snaps
    pub fn ease_toward_target(&mut self) {
        self.x += (self.target_x - self.x) * PLAYER_EASING;
    }

    /// y of the trailing (bottom) edge
    pub fn trailing_edge(&self) -> f32 {
        self.y + self.height
    }
}

/// Cosmetic obstacle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Car,
    Barrier,
}

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub x: f32,
    /// Top edge; negative while above the visible track
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Fall rate captured at spawn
    pub speed: f32,
    pub color: Color,
    pub kind: ObstacleKind,
    /// Near-miss evaluation already happened
    pub passed: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Top edge has scrolled past the bottom of the track
    pub fn is_off_track(&self) -> bool {
        self.y >= CANVAS_HEIGHT
    }
}

/// Running stats for a single run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GameStats {
    /// Derived: `floor(distance * 10) + near_misses * 50`
    pub score: u64,
    pub distance: f32,
    pub near_misses: u32,
    pub collisions: u32,
    /// Highest speed seen this run
    pub top_speed: f32,
}

impl GameStats {
    /// Stats at the start of a run
    pub fn initial() -> Self {
        Self {
            top_speed: INITIAL_SPEED,
            ..Self::default()
        }
    }

    /// Score as a pure function of distance and near misses
    pub fn derived_score(distance: f32, near_misses: u32) -> u64 {
        (distance * SCORE_PER_DISTANCE).floor() as u64 + near_misses as u64 * NEAR_MISS_BONUS
    }

    pub fn recompute_score(&mut self) {
        self.score = Self::derived_score(self.distance, self.near_misses);
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub player: PlayerCar,
    /// Active obstacles
    pub obstacles: Vec<Obstacle>,
    /// Global scroll speed (units per frame)
    pub speed: f32,
    /// Frames simulated this run
    pub frame_count: u64,
    /// Lane-line scroll phase, cosmetic
    pub road_offset: f32,
    /// Selected lane (0..LANE_COUNT)
    pub lane_index: usize,
    pub stats: GameStats,
    pub phase: RunPhase,
    rng: Pcg32,
    next_id: u32,
}

impl SimulationState {
    /// Fresh run state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            player: PlayerCar::default(),
            obstacles: Vec::new(),
            speed: INITIAL_SPEED,
            frame_count: 0,
            road_offset: 0.0,
            lane_index: START_LANE,
            stats: GameStats::initial(),
            phase: RunPhase::Running,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Select a lane (clamped) and retarget the player at its center
    pub fn set_lane(&mut self, lane: usize) {
        self.lane_index = clamp_lane(lane);
        self.player.target_x = lane_x(self.lane_index, self.player.width);
    }

    /// Immutable copy of the current stats
    pub fn snapshot(&self) -> GameStats {
        self.stats
    }
}
