use glam::Vec2;
use std::f32::consts;

pub trait F32MathUtils {
    fn normalize_angle(&self) -> f32;
}

pub trait Vec2MathUtils {
    fn heading_to(&self, target: Vec2) -> f32;
}

impl F32MathUtils for f32 {
    /// Folds an angle into (-π, π].
    fn normalize_angle(&self) -> f32 {
        let angle = (self + consts::TAU) % consts::TAU;

        if angle > consts::PI {
            angle - consts::TAU
        } else {
            angle
        }
    }
}

impl Vec2MathUtils for Vec2 {
    fn heading_to(&self, target: Vec2) -> f32 {
        (target.y - self.y).atan2(target.x - self.x)
    }
}
