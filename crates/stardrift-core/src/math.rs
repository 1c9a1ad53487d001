//! Vector helpers on top of [`glam`].

use glam::{Vec2, Vec3};

/// Distance from `point` to `(x, y)` in the XY plane, ignoring depth.
pub fn planar_distance(point: Vec3, x: f32, y: f32) -> f32 {
    point.truncate().distance(Vec2::new(x, y))
}

/// Move `current` toward `target` by `rate` of the remaining distance, per axis.
pub fn ease_toward(current: &mut Vec3, target: Vec3, rate: f32) {
    *current += (target - *current) * rate;
}
