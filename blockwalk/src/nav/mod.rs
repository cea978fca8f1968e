pub mod straight;
pub mod turn;

pub use straight::plan_littlebit_move;
pub use straight::plan_straight_move;
pub use turn::plan_turn;
pub use turn::TurnDirection;

use crate::map::MapModel;
use crate::utils::math::F32MathUtils;
use crate::utils::math::Vec2MathUtils;
use glam::Vec2;
use std::f32::consts;

/// Maximum deviation from the current heading accepted when picking the next edge.
pub const FORWARD_CONE: f32 = consts::FRAC_PI_6;

/// Angular offsets between 45° and 135° count as a proper turn.
pub const TURN_BAND_MIN: f32 = consts::FRAC_PI_4;
pub const TURN_BAND_MAX: f32 = 3.0 * consts::FRAC_PI_4;

/// Offsets this close to straight ahead are not turns at all.
pub const TURN_DEADZONE: f32 = 0.1;

/// An ordered walk across the map, starting at the current position. The
/// final heading is the direction of the last traversed edge.
#[derive(Clone, Debug)]
pub struct PathPlan {
    pub path: Vec<Vec2>,
    pub final_heading: f32,
}

#[derive(Clone, Debug)]
pub enum StraightMove {
    Feasible(PathPlan),
    Blocked { valid_blocks: u32 },
}

impl StraightMove {
    pub fn is_feasible(&self) -> bool {
        matches!(self, StraightMove::Feasible(_))
    }
}

/// Picks the connection deviating least from the heading, accepted only
/// strictly inside the forward cone. The strict comparison keeps the first
/// connection found at the minimal deviation.
pub(crate) fn best_forward_step(map: &MapModel, position: Vec2, heading: f32, tolerance: f32) -> Option<Vec2> {
    let mut best = None;
    let mut smallest = FORWARD_CONE;

    for connection in map.connections_at(position, tolerance) {
        let next = connection.opposite_end(position, tolerance);
        let deviation = (position.heading_to(next) - heading).normalize_angle().abs();

        if deviation < smallest {
            smallest = deviation;
            best = Some(next);
        }
    }

    best
}
