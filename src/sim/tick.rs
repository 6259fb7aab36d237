//! Per-frame simulation step
//!
//! Called once per animation frame while a run is active. The host owns the
//! timing; one call is one frame at the nominal 60 Hz.

use log::{debug, info};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::is_near_miss;
use super::state::{GameEvent, GameStats, Obstacle, ObstacleKind, RunPhase, SimulationState};
use crate::consts::*;
use crate::lane_x;
use crate::theme::{Color, TrackTheme};

/// Lane-line dash phase wraps at a quarter of the track height
const ROAD_OFFSET_PERIOD: f32 = CANVAS_HEIGHT / 4.0;

/// Result of advancing one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Events raised this frame, in the order they happened
    pub events: Vec<GameEvent>,
    /// Stats after all of this frame's mutations
    pub stats: GameStats,
    /// A collision ended the run on this frame
    pub game_over: bool,
}

/// Frames between spawns at the given speed
pub fn spawn_rate(speed: f32) -> u64 {
    let tightening = (speed * SPAWN_SPEED_FACTOR).floor().max(0.0) as u64;
    SPAWN_BASE_FRAMES
        .saturating_sub(tightening)
        .max(SPAWN_MIN_FRAMES)
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimulationState, theme: &TrackTheme) -> FrameOutcome {
    let mut outcome = FrameOutcome {
        stats: state.snapshot(),
        ..Default::default()
    };

    // Terminated runs are frozen until the shell replaces the state
    if !state.is_running() {
        return outcome;
    }

    state.player.ease_toward_target();

    // Linear speed ramp
    if state.speed < MAX_SPEED {
        let previous = state.speed;
        state.speed = (state.speed + SPEED_INCREMENT).min(MAX_SPEED);
        if state.speed.floor() > previous.floor() {
            debug!("Speed up: {:.0}", state.speed.floor());
            outcome.events.push(GameEvent::SpeedUp);
        }
    }
    state.stats.top_speed = state.stats.top_speed.max(state.speed);

    state.road_offset = (state.road_offset + state.speed) % ROAD_OFFSET_PERIOD;

    // Distance and score
    let previous_distance = state.stats.distance;
    state.stats.distance += state.speed / NOMINAL_FPS;
    state.stats.recompute_score();
    if (state.stats.distance / MILESTONE_DISTANCE).floor()
        > (previous_distance / MILESTONE_DISTANCE).floor()
    {
        debug!("Milestone at {:.0}", state.stats.distance);
        outcome.events.push(GameEvent::Milestone);
    }

    // Spawn cadence tightens with speed
    state.frame_count += 1;
    if state.frame_count % spawn_rate(state.speed) == 0 {
        spawn_obstacle(state, theme);
    }

    advance_obstacles(state, &mut outcome);

    outcome.stats = state.snapshot();
    outcome
}

/// Move, collide, near-miss and cull every active obstacle.
///
/// Stops at the first collision; obstacles after it are left untouched.
fn advance_obstacles(state: &mut SimulationState, outcome: &mut FrameOutcome) {
    let speed = state.speed;
    let player_rect = state.player.rect();
    let player_x = state.player.x;
    let trailing_edge = state.player.trailing_edge();

    let mut i = 0;
    while i < state.obstacles.len() {
        let obstacle = &mut state.obstacles[i];
        obstacle.y += speed;

        if player_rect.overlaps(&obstacle.rect(), COLLISION_BUFFER) {
            let crashed = state.obstacles.remove(i);
            state.stats.collisions += 1;
            state.phase = RunPhase::Terminated;
            outcome.events.push(GameEvent::Crash);
            outcome.game_over = true;
            info!(
                "Crashed into obstacle {} - score {}, distance {:.0}, near misses {}",
                crashed.id, state.stats.score, state.stats.distance, state.stats.near_misses
            );
            return;
        }

        if !obstacle.passed && obstacle.y > trailing_edge {
            obstacle.passed = true;
            if is_near_miss(player_x, obstacle.x) {
                state.stats.near_misses += 1;
                state.stats.recompute_score();
                debug!("Near miss #{} (obstacle {})", state.stats.near_misses, obstacle.id);
                outcome.events.push(GameEvent::NearMiss);
            }
        }

        if obstacle.is_off_track() {
            state.obstacles.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Spawn one obstacle above the track in a random lane; returns its id
pub fn spawn_obstacle(state: &mut SimulationState, theme: &TrackTheme) -> u32 {
    let id = state.next_entity_id();
    let fall_speed = state.speed * OBSTACLE_SPEED_FACTOR;

    let rng = state.rng();
    let lane = rng.random_range(0..LANE_COUNT);
    let color = theme
        .obstacle_colors
        .choose(rng)
        .copied()
        .unwrap_or(Color::WHITE);
    let kind = if rng.random_bool(BARRIER_CHANCE) {
        ObstacleKind::Barrier
    } else {
        ObstacleKind::Car
    };

    debug!("Spawn obstacle {} in lane {} ({:?})", id, lane, kind);
    state.obstacles.push(Obstacle {
        id,
        x: lane_x(lane, OBSTACLE_WIDTH),
        y: -OBSTACLE_HEIGHT,
        width: OBSTACLE_WIDTH,
        height: OBSTACLE_HEIGHT,
        speed: fall_speed,
        color,
        kind,
        passed: false,
    });
    id
}
