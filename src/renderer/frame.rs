//! Frame geometry
//!
//! Turns a simulation snapshot and its theme into one triangle list.
//! Reads the state only; safe to call with any obstacle set or player position.

use glam::Vec2;

use super::shapes::{dashed_vline, fill_rect, glow, stroke_rect};
use super::vertex::{Vertex, colors};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, LANE_COUNT, LANE_WIDTH};
use crate::sim::{Obstacle, PlayerCar, Rect, SimulationState};
use crate::theme::TrackTheme;

/// Lane divider dash pattern (on, off)
pub const DASH_PATTERN: (f32, f32) = (40.0, 40.0);
pub const LANE_LINE_WIDTH: f32 = 4.0;
pub const BORDER_WIDTH: f32 = 8.0;
pub const GLOW_BLUR: f32 = 15.0;
/// Obstacle decoration inset from each side
pub const OBSTACLE_DETAIL_INSET: f32 = 10.0;

/// Per-frame presentation switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOptions {
    /// Glow around the player car
    pub glow: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self { glow: true }
    }
}

/// Build the full frame, back to front
pub fn build_frame(
    state: &SimulationState,
    theme: &TrackTheme,
    options: FrameOptions,
) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(256 + state.obstacles.len() * 12);

    // Road
    fill_rect(
        &mut out,
        &Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT),
        theme.road_color.to_array(),
    );

    // Inner lane dividers scroll with the road offset
    let line_color = theme.line_color.to_array();
    for lane in 1..LANE_COUNT {
        dashed_vline(
            &mut out,
            Vec2::new(lane as f32 * LANE_WIDTH, -state.road_offset),
            CANVAS_HEIGHT,
            LANE_LINE_WIDTH,
            DASH_PATTERN,
            line_color,
        );
    }

    // Track border
    let half = BORDER_WIDTH / 2.0;
    stroke_rect(
        &mut out,
        &Rect::new(half, 0.0, CANVAS_WIDTH - BORDER_WIDTH, CANVAS_HEIGHT),
        BORDER_WIDTH,
        line_color,
    );

    player_car(&mut out, &state.player, theme, options);

    for obstacle in &state.obstacles {
        obstacle_shape(&mut out, obstacle);
    }

    out
}

fn player_car(
    out: &mut Vec<Vertex>,
    player: &PlayerCar,
    theme: &TrackTheme,
    options: FrameOptions,
) {
    let body = player.rect();
    if options.glow {
        glow(out, &body, GLOW_BLUR, theme.line_color.to_array());
    }
    fill_rect(out, &body, colors::PLAYER_BODY);

    // Windshield
    fill_rect(
        out,
        &Rect::new(player.x + 5.0, player.y + 20.0, player.width - 10.0, 20.0),
        colors::PLAYER_WINDOW,
    );
    // Headlights
    fill_rect(
        out,
        &Rect::new(player.x + 5.0, player.y + 5.0, 10.0, 5.0),
        colors::PLAYER_HEADLIGHT,
    );
    fill_rect(
        out,
        &Rect::new(player.x + player.width - 15.0, player.y + 5.0, 10.0, 5.0),
        colors::PLAYER_HEADLIGHT,
    );
}

fn obstacle_shape(out: &mut Vec<Vertex>, obstacle: &Obstacle) {
    let body = obstacle.rect();
    fill_rect(out, &body, obstacle.color.to_array());
    fill_rect(out, &body.inset(OBSTACLE_DETAIL_INSET), colors::OBSTACLE_INSET);
}
