//! Axis-aligned rectangle overlap and near-miss tests

use glam::Vec2;

use crate::consts::LANE_WIDTH;

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Shrink (positive) or grow (negative) by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            pos: self.pos + Vec2::splat(amount),
            size: self.size - Vec2::splat(amount * 2.0),
        }
    }

    /// Overlap on both axes with `other` pulled in by `buffer` on each side.
    ///
    /// Edges that merely touch do not count. A larger buffer only ever
    /// removes hits, so `overlaps(o, b)` implies `overlaps(o, 0.0)` for b >= 0.
    pub fn overlaps(&self, other: &Rect, buffer: f32) -> bool {
        self.left() < other.right() - buffer
            && self.right() > other.left() + buffer
            && self.top() < other.bottom() - buffer
            && self.bottom() > other.top() + buffer
    }
}

/// Raw-x separation under one lane width
///
/// Compares left edges, not centers; both cars are lane-centered so the
/// origin offset only differs by the width mismatch.
pub fn is_near_miss(player_x: f32, obstacle_x: f32) -> bool {
    (player_x - obstacle_x).abs() < LANE_WIDTH
}
