// Formation planning for group move orders
use bevy::prelude::*;

use crate::error::OrderRejection;
use crate::math_utils::point_on_circle;

/// Radius of the ring that holds `count` agents; grows with sqrt(N) so spacing stays roughly constant
pub fn ring_radius(count: usize, spacing: f32) -> f32 {
    spacing * (count as f32).sqrt()
}

/// `count` points evenly spread on a ring around `center`, the first one at angle 0.
/// A single agent gets the center itself.
pub fn ring_formation(center: Vec2, count: usize, spacing: f32) -> Result<Vec<Vec2>, OrderRejection> {
    match count {
        0 => Err(OrderRejection::InvalidCount),
        1 => Ok(vec![center]),
        _ => {
            let radius = ring_radius(count, spacing);
            let angle_step = 360.0 / count as f32;
            Ok((0..count)
                .map(|i| point_on_circle(center, radius, i as f32 * angle_step))
                .collect())
        }
    }
}
