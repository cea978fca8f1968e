use crate::nav::PathPlan;
use crate::utils::math::F32MathUtils;
use crate::utils::math::Vec2MathUtils;
use glam::Vec2;
use log::debug;
use log::warn;
use std::f32::consts;

/// Linear speed in map units per second.
pub const MOVEMENT_SPEED: f32 = 100.0;

/// Angular speed in radians per second.
pub const ROTATION_SPEED: f32 = consts::PI;

/// Short rotations are stretched to stay visible.
pub const MIN_ROTATION_TIME: f32 = 0.5;

/// Rotations below this sweep complete without animating.
pub const ROTATION_EPSILON: f32 = 0.01;

/// Interpolated pose for the renderer only. Never feeds back into planning,
/// the settled position and heading are the source of truth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    pub position: Vec2,
    pub heading: f32,
    pub moving: bool,
}

enum MotionState {
    Idle,
    Moving { path: Vec<Vec2>, final_heading: f32, segment: usize, elapsed: f32, duration: f32 },
    Rotating { from: f32, sweep: f32, target: f32, elapsed: f32, duration: f32 },
}

/// Animates one operation at a time: either a path traversal or a rotation,
/// never both. The settled position always snaps back to exact map
/// coordinates when a segment completes.
pub struct MotionController {
    position: Vec2,
    heading: f32,
    state: MotionState,
    completed: bool,
}

impl MotionController {
    pub fn new(position: Vec2, heading: f32) -> Self {
        Self { position, heading, state: MotionState::Idle, completed: false }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self.state, MotionState::Idle)
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MotionState::Moving { .. })
    }

    /// Starts traversing a planned path edge by edge. Paths shorter than one
    /// edge complete immediately without animation.
    pub fn start_path(&mut self, plan: PathPlan) -> bool {
        if self.is_busy() {
            warn!("Movement rejected, the controller is busy");
            return false;
        }

        if plan.path.len() < 2 {
            self.completed = true;
            return true;
        }

        // The heading turns onto each segment before that segment animates.
        self.heading = plan.path[0].heading_to(plan.path[1]);
        let duration = plan.path[0].distance(plan.path[1]) / MOVEMENT_SPEED;
        self.state = MotionState::Moving { path: plan.path, final_heading: plan.final_heading, segment: 0, elapsed: 0.0, duration };

        true
    }

    /// Rotates to the target heading via the shorter angular path.
    pub fn start_rotation(&mut self, target: f32) -> bool {
        if self.is_busy() {
            warn!("Rotation rejected, the controller is busy");
            return false;
        }

        let sweep = (target - self.heading).normalize_angle();
        if sweep.abs() < ROTATION_EPSILON {
            self.heading = target;
            self.completed = true;
            return true;
        }

        let duration = (sweep.abs() / ROTATION_SPEED).max(MIN_ROTATION_TIME);
        debug!("Rotating from {:.1}° to {:.1}° over {:.2}s", self.heading.to_degrees(), target.to_degrees(), duration);
        self.state = MotionState::Rotating { from: self.heading, sweep, target, elapsed: 0.0, duration };

        true
    }

    pub fn update(&mut self, delta: f32) {
        match std::mem::replace(&mut self.state, MotionState::Idle) {
            MotionState::Idle => {}
            MotionState::Moving { path, final_heading, mut segment, mut elapsed, mut duration } => {
                elapsed += delta;

                while elapsed >= duration {
                    elapsed -= duration;
                    segment += 1;
                    self.position = path[segment];

                    if segment + 1 == path.len() {
                        self.heading = final_heading;
                        self.completed = true;
                        debug!("Movement complete at ({}, {})", self.position.x, self.position.y);
                        return;
                    }

                    self.heading = path[segment].heading_to(path[segment + 1]);
                    duration = path[segment].distance(path[segment + 1]) / MOVEMENT_SPEED;
                }

                self.state = MotionState::Moving { path, final_heading, segment, elapsed, duration };
            }
            MotionState::Rotating { from, sweep, target, mut elapsed, duration } => {
                elapsed += delta;

                if elapsed >= duration {
                    // Settle to the exact target, not the animated value.
                    self.heading = target;
                    self.completed = true;
                    debug!("Rotation complete, now facing {:.1}°", self.heading.to_degrees());
                } else {
                    self.state = MotionState::Rotating { from, sweep, target, elapsed, duration };
                }
            }
        }
    }

    /// Single-shot completion flag, consumable exactly once per operation.
    pub fn take_completed(&mut self) -> bool {
        std::mem::take(&mut self.completed)
    }

    /// Interpolated pose for drawing the current frame.
    pub fn frame(&self) -> AnimationFrame {
        match &self.state {
            MotionState::Idle => AnimationFrame { position: self.position, heading: self.heading, moving: false },
            MotionState::Moving { path, segment, elapsed, duration, .. } => {
                let progress = if *duration > 0.0 { (elapsed / duration).min(1.0) } else { 1.0 };
                AnimationFrame { position: path[*segment].lerp(path[*segment + 1], progress), heading: self.heading, moving: true }
            }
            MotionState::Rotating { from, sweep, elapsed, duration, .. } => {
                let progress = (elapsed / duration).min(1.0);
                AnimationFrame { position: self.position, heading: (from + sweep * progress).normalize_angle(), moving: false }
            }
        }
    }

    /// Teleports to a settled pose, dropping any operation in progress.
    pub fn warp_to(&mut self, position: Vec2, heading: f32) {
        self.position = position;
        self.heading = heading;
        self.state = MotionState::Idle;
        self.completed = false;
    }

    /// Stop request: the busy state clears without a completion signal and the
    /// settled position stays where the last segment finished.
    pub fn cancel(&mut self) {
        self.state = MotionState::Idle;
        self.completed = false;
    }
}
