//! Keyboard and touch mapping to lane selection
//!
//! Keys step one lane at a time; a tap jumps straight to the lane under the
//! finger (screen split into equal thirds).

use crate::consts::LANE_COUNT;
use crate::sim::SimulationState;

/// A lane-changing input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneInput {
    /// Step one lane left (floored at lane 0)
    Left,
    /// Step one lane right (capped at the last lane)
    Right,
    /// Tap at `x` on a surface `width` wide
    Tap { x: f32, width: f32 },
}

impl LaneInput {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" => Some(LaneInput::Left),
            "ArrowRight" | "d" => Some(LaneInput::Right),
            _ => None,
        }
    }

    /// Map the first touch point, if any
    pub fn from_touch(first_touch_x: Option<f32>, width: f32) -> Option<Self> {
        let x = first_touch_x?;
        if !x.is_finite() || !width.is_finite() || width <= 0.0 {
            return None;
        }
        Some(LaneInput::Tap { x, width })
    }

    /// Lane this input selects when the current lane is `current`
    pub fn resolve(&self, current: usize) -> usize {
        match *self {
            LaneInput::Left => current.saturating_sub(1),
            LaneInput::Right => (current + 1).min(LANE_COUNT - 1),
            LaneInput::Tap { x, width } => tap_lane(x, width),
        }
    }
}

/// Lane under a tap; positions outside the surface clamp to the edge lanes
pub fn tap_lane(x: f32, width: f32) -> usize {
    let third = width / LANE_COUNT as f32;
    if x < third {
        0
    } else if x < third * 2.0 {
        1
    } else {
        2
    }
}

/// Apply an input to the running simulation
pub fn apply_input(state: &mut SimulationState, input: LaneInput) {
    let lane = input.resolve(state.lane_index);
    state.set_lane(lane);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_WIDTH;
    use crate::lane_x;
    use proptest::prelude::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(LaneInput::from_key("ArrowLeft"), Some(LaneInput::Left));
        assert_eq!(LaneInput::from_key("a"), Some(LaneInput::Left));
        assert_eq!(LaneInput::from_key("ArrowRight"), Some(LaneInput::Right));
        assert_eq!(LaneInput::from_key("d"), Some(LaneInput::Right));
        assert_eq!(LaneInput::from_key("w"), None);
        assert_eq!(LaneInput::from_key(" "), None);
    }

    #[test]
    fn test_stepping_is_clamped() {
        let mut state = SimulationState::new(1);
        apply_input(&mut state, LaneInput::Left);
        apply_input(&mut state, LaneInput::Left);
        assert_eq!(state.lane_index, 0);
        assert_eq!(state.player.target_x, lane_x(0, PLAYER_WIDTH));

        for _ in 0..5 {
            apply_input(&mut state, LaneInput::Right);
        }
        assert_eq!(state.lane_index, 2);
        assert_eq!(state.player.target_x, lane_x(2, PLAYER_WIDTH));
    }

    #[test]
    fn test_tap_thirds() {
        assert_eq!(tap_lane(0.0, 900.0), 0);
        assert_eq!(tap_lane(299.9, 900.0), 0);
        assert_eq!(tap_lane(300.0, 900.0), 1);
        assert_eq!(tap_lane(599.9, 900.0), 1);
        assert_eq!(tap_lane(600.0, 900.0), 2);
        assert_eq!(tap_lane(5000.0, 900.0), 2);
        assert_eq!(tap_lane(-20.0, 900.0), 0);
    }

    #[test]
    fn test_tap_is_direct_positioning() {
        let mut state = SimulationState::new(1);
        apply_input(&mut state, LaneInput::Tap { x: 10.0, width: 300.0 });
        assert_eq!(state.lane_index, 0);
        apply_input(&mut state, LaneInput::Tap { x: 290.0, width: 300.0 });
        assert_eq!(state.lane_index, 2);
    }

    #[test]
    fn test_malformed_touch_is_ignored() {
        assert_eq!(LaneInput::from_touch(None, 800.0), None);
        assert_eq!(LaneInput::from_touch(Some(10.0), 0.0), None);
        assert_eq!(LaneInput::from_touch(Some(f32::NAN), 800.0), None);
        assert_eq!(
            LaneInput::from_touch(Some(10.0), 800.0),
            Some(LaneInput::Tap { x: 10.0, width: 800.0 })
        );
    }

    #[test]
    fn test_repeated_input_reissues_same_target() {
        let mut state = SimulationState::new(1);
        apply_input(&mut state, LaneInput::Tap { x: 10.0, width: 300.0 });
        let target = state.player.target_x;
        apply_input(&mut state, LaneInput::Tap { x: 20.0, width: 300.0 });
        assert_eq!(state.player.target_x, target);
    }

    proptest! {
        #[test]
        fn prop_lane_stays_in_range(steps in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut state = SimulationState::new(1);
            for right in steps {
                let input = if right { LaneInput::Right } else { LaneInput::Left };
                apply_input(&mut state, input);
                prop_assert!(state.lane_index < LANE_COUNT);
                prop_assert_eq!(state.player.target_x, lane_x(state.lane_index, PLAYER_WIDTH));
            }
        }
    }
}
