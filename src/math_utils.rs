use bevy::prelude::*;

/// Move `current` toward `target` by at most `max_step`, never overshooting
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        return target;
    }
    current + offset / distance * max_step
}

/// Point on a circle around `center`, angle in degrees counter-clockwise from +X
pub fn point_on_circle(center: Vec2, radius: f32, angle_degrees: f32) -> Vec2 {
    let angle = angle_degrees.to_radians();
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Axis-aligned bounds (min, max) spanned by two corners, regardless of drag direction
pub fn normalized_bounds(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
    (a.min(b), a.max(b))
}
