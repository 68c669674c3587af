// Selection input handling: raw mouse / keyboard -> discrete command inputs -> selection changes and orders
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::commands::UnitOrder;
use crate::config::CommandConfig;
use crate::spatial::AgentIndex;
use crate::types::RtsCamera;

use super::state::{ClickOutcome, SelectionState};
use super::utils::{additive_modifier_held, cursor_to_world};

/// Discrete input events the core reacts to. Points are in world space.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum CommandInput {
    PrimaryPressed { point: Vec2, additive: bool },
    PrimaryHeld { point: Vec2 },
    PrimaryReleased { point: Vec2 },
    SecondaryPressed { point: Vec2 },
    StopPressed,
    PatrolPressed { point: Vec2 },
}

/// System: translate mouse buttons, keys and the cursor into [`CommandInput`] events.
/// Left button selects, right button moves, S stops, P patrols to the cursor.
pub fn read_pointer_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<RtsCamera>>,
    selection_state: Res<SelectionState>,
    mut inputs: EventWriter<CommandInput>,
) {
    // Stop does not depend on where the cursor is
    if keyboard.just_pressed(KeyCode::KeyS) {
        inputs.write(CommandInput::StopPressed);
    }

    let cursor_point = window_query
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor_pos| {
            let (camera, camera_transform) = camera_query.single().ok()?;
            cursor_to_world(cursor_pos, camera, camera_transform)
        });

    if let Some(point) = cursor_point {
        if mouse_button.just_pressed(MouseButton::Left) {
            let additive = additive_modifier_held(&keyboard);
            inputs.write(CommandInput::PrimaryPressed { point, additive });
        } else if mouse_button.pressed(MouseButton::Left) {
            inputs.write(CommandInput::PrimaryHeld { point });
        }
    }

    // A drag released outside the window still ends, at the last point it was seen
    if mouse_button.just_released(MouseButton::Left) {
        let last_seen = selection_state.drag.map(|drag| drag.current);
        if let Some(point) = cursor_point.or(last_seen) {
            inputs.write(CommandInput::PrimaryReleased { point });
        }
    }

    let Some(point) = cursor_point else { return };

    if mouse_button.just_pressed(MouseButton::Right) {
        inputs.write(CommandInput::SecondaryPressed { point });
    }

    if keyboard.just_pressed(KeyCode::KeyP) {
        inputs.write(CommandInput::PatrolPressed { point });
    }
}

/// System: apply command inputs to the selection and forward order intents
pub fn apply_selection_input(
    mut inputs: EventReader<CommandInput>,
    mut orders: EventWriter<UnitOrder>,
    mut selection_state: ResMut<SelectionState>,
    index: Res<AgentIndex>,
    config: Res<CommandConfig>,
    time: Res<Time>,
) {
    let now = time.elapsed_secs_f64();

    for &input in inputs.read() {
        match input {
            CommandInput::PrimaryPressed { point, additive } => {
                let outcome = selection_state.click(&index, point, additive, now, &config);
                match outcome {
                    ClickOutcome::Selected(entity) => info!("Selected {:?}", entity),
                    ClickOutcome::Added(entity) => {
                        info!("Added {:?} to selection ({} total)", entity, selection_state.selected_count())
                    }
                    ClickOutcome::SelectedClass { anchor, count } => {
                        let class = index.get(anchor).map(|a| a.class.name()).unwrap_or("?");
                        info!("Double click selected all {} {} units", count, class);
                    }
                    ClickOutcome::Cleared => debug!("Selection cleared"),
                    ClickOutcome::Unchanged => {}
                }
                selection_state.begin_drag(point);
            }
            CommandInput::PrimaryHeld { point } => selection_state.update_drag(point),
            CommandInput::PrimaryReleased { point } => {
                if let Some(count) = selection_state.finish_drag(&index, point, &config) {
                    info!("Box selected {} units", count);
                }
            }
            CommandInput::SecondaryPressed { point } => {
                orders.write(UnitOrder::Move(point));
            }
            CommandInput::StopPressed => {
                orders.write(UnitOrder::Stop);
            }
            CommandInput::PatrolPressed { point } => {
                orders.write(UnitOrder::Patrol(point));
            }
        }
    }
}
