use super::best_forward_step;
use super::PathPlan;
use super::StraightMove;
use crate::map::same_point;
use crate::map::MapModel;
use crate::map::PointKind;
use crate::utils::math::Vec2MathUtils;
use glam::Vec2;
use log::debug;

/// Plans a "go straight for N blocks" walk. Littlebit points are passed
/// through without consuming the block budget, and reaching the destination
/// ends the plan early no matter how much budget remains.
pub fn plan_straight_move(map: &MapModel, from: Vec2, heading: f32, blocks: u32, destination: Vec2, tolerance: f32) -> StraightMove {
    if blocks == 0 {
        return StraightMove::Blocked { valid_blocks: 0 };
    }

    let mut position = from;
    let mut current_heading = heading;
    let mut remaining = blocks;
    let mut path = vec![from];

    while remaining > 0 {
        let next = match best_forward_step(map, position, current_heading, tolerance) {
            Some(next) => next,
            None => {
                debug!("No path forward at ({}, {}), {} blocks remaining", position.x, position.y, remaining);
                return StraightMove::Blocked { valid_blocks: blocks - remaining };
            }
        };

        path.push(next);

        let littlebit = map.find_point(next, tolerance).map(|point| point.kind == PointKind::Littlebit).unwrap_or(false);
        if !littlebit {
            remaining -= 1;
        }

        // The next cone test runs against the edge just traversed.
        current_heading = position.heading_to(next);
        position = next;

        if same_point(next, destination, tolerance) {
            debug!("Reached the destination mid-plan, stopping early");
            break;
        }
    }

    StraightMove::Feasible(PathPlan { path, final_heading: current_heading })
}

/// Plans a "go forward a little bit" walk. Accumulates the run of consecutive
/// littlebit points ahead, then ends the path at the first collected point
/// that is directly connected to the destination, falling back to the first
/// littlebit point found, or the full walk when there were none.
pub fn plan_littlebit_move(map: &MapModel, from: Vec2, heading: f32, destination: Vec2, tolerance: f32) -> StraightMove {
    let mut position = from;
    let mut current_heading = heading;
    let mut path = vec![from];
    let mut littlebits = Vec::new();

    loop {
        let next = match best_forward_step(map, position, current_heading, tolerance) {
            Some(next) => next,
            None => {
                debug!("No path forward at ({}, {})", position.x, position.y);
                return StraightMove::Blocked { valid_blocks: 0 };
            }
        };

        current_heading = position.heading_to(next);
        path.push(next);

        if same_point(next, destination, tolerance) {
            break;
        }

        let littlebit = map.find_point(next, tolerance).map(|point| point.kind == PointKind::Littlebit).unwrap_or(false);
        if littlebit {
            littlebits.push(path.len() - 1);
            position = next;
        } else {
            break;
        }
    }

    // Discovery order, not nearest: the first collected littlebit point with a
    // direct connection to the destination wins.
    for &index in &littlebits {
        if map.has_direct_connection(path[index], destination, tolerance) {
            debug!("Littlebit point ({}, {}) is connected to the destination", path[index].x, path[index].y);
            return StraightMove::Feasible(truncated(&path, index));
        }
    }

    if let Some(&index) = littlebits.first() {
        return StraightMove::Feasible(truncated(&path, index));
    }

    StraightMove::Feasible(PathPlan { path, final_heading: current_heading })
}

fn truncated(path: &[Vec2], last: usize) -> PathPlan {
    let final_heading = path[last - 1].heading_to(path[last]);
    PathPlan { path: path[..=last].to_vec(), final_heading }
}
