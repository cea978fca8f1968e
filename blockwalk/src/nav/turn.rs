use super::TURN_BAND_MAX;
use super::TURN_BAND_MIN;
use super::TURN_DEADZONE;
use crate::map::MapModel;
use crate::utils::math::F32MathUtils;
use crate::utils::math::Vec2MathUtils;
use glam::Vec2;
use log::debug;
use std::f32::consts;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

/// Resolves a turn request to the heading of the selected connection.
///
/// Offsets are folded into the requested rotational sense (negative for left,
/// positive for right), candidates within the proper-turn band are preferred,
/// and with none in the band the smallest offset wins. No connection in the
/// requested sense means the turn is unavailable, there is no default.
pub fn plan_turn(map: &MapModel, position: Vec2, heading: f32, direction: TurnDirection, tolerance: f32) -> Option<f32> {
    let current = heading.normalize_angle();
    let mut candidates = Vec::new();

    for connection in map.connections_at(position, tolerance) {
        let angle = position.heading_to(connection.opposite_end(position, tolerance));
        let mut offset = (angle - current).normalize_angle();

        match direction {
            TurnDirection::Left => {
                if offset > 0.0 {
                    offset -= consts::TAU;
                }
                if offset < -TURN_DEADZONE {
                    candidates.push((offset, angle));
                }
            }
            TurnDirection::Right => {
                if offset < 0.0 {
                    offset += consts::TAU;
                }
                if offset > TURN_DEADZONE {
                    candidates.push((offset, angle));
                }
            }
        }
    }

    if candidates.is_empty() {
        debug!("No {:?} turn available from heading {:.1}°", direction, current.to_degrees());
        return None;
    }

    // Stable sort by offset magnitude, exact ties keep the authored order.
    candidates.sort_by(|a, b| a.0.abs().total_cmp(&b.0.abs()));

    let ideal = candidates.iter().find(|(offset, _)| offset.abs() >= TURN_BAND_MIN && offset.abs() <= TURN_BAND_MAX);
    let (offset, angle) = ideal.unwrap_or(&candidates[0]);

    debug!("Turning {:?} by {:.1}° to heading {:.1}°", direction, offset.to_degrees(), angle.to_degrees());
    Some(*angle)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::map::PointKind;

    fn junction(spokes: &[f32]) -> MapModel {
        let mut points = vec![point(0.0, 0.0, PointKind::Start), point(500.0, 500.0, PointKind::Destination)];
        let mut connections = vec![];

        for degrees in spokes {
            let end = (100.0 * degrees.to_radians().cos(), 100.0 * degrees.to_radians().sin());
            points.push(point(end.0, end.1, PointKind::Plain));
            connections.push(connect((0.0, 0.0), end));
        }

        map(points, connections)
    }

    fn assert_heading(actual: Option<f32>, degrees: f32) {
        let actual = actual.expect("expected a turn target");
        assert!((actual - degrees.to_radians()).abs() < 0.001, "expected {}°, got {}°", degrees, actual.to_degrees());
    }

    #[test]
    fn right_turn_prefers_the_proper_band_over_the_smallest_offset() {
        let map = junction(&[10.0, 95.0]);

        assert_heading(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Right, 1.0), 95.0);
    }

    #[test]
    fn left_turn_prefers_the_proper_band_over_the_smallest_offset() {
        let map = junction(&[-10.0, -95.0]);

        assert_heading(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Left, 1.0), -95.0);
    }

    #[test]
    fn falls_back_to_the_smallest_offset_outside_the_band() {
        let map = junction(&[150.0]);

        assert_heading(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Right, 1.0), 150.0);
    }

    #[test]
    fn straight_ahead_is_not_a_turn() {
        let map = junction(&[0.0]);

        assert!(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Left, 1.0).is_none());
        assert!(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Right, 1.0).is_none());
    }

    #[test]
    fn opposite_sense_offsets_wrap_around() {
        // A connection 90° to the left is also a 270° right turn.
        let map = junction(&[-90.0]);

        assert_heading(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Right, 1.0), -90.0);
        assert_heading(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Left, 1.0), -90.0);
    }

    #[test]
    fn band_member_beats_a_nearer_wrapped_candidate() {
        // Right turn with spokes at +95° and -30°: the -30° spoke wraps to
        // +330° and loses to the proper turn.
        let map = junction(&[-30.0, 95.0]);

        assert_heading(plan_turn(&map, Vec2::ZERO, 0.0, TurnDirection::Right, 1.0), 95.0);
    }
}
