// Shared utility functions for selection module
use bevy::prelude::*;

/// Convert a window cursor position to a point on the 2D ground plane
pub fn cursor_to_world(
    cursor_pos: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
) -> Option<Vec2> {
    camera.viewport_to_world_2d(camera_transform, cursor_pos).ok()
}

/// Either shift key counts as the additive-selection modifier
pub fn additive_modifier_held(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight])
}
