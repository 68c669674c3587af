use bevy::prelude::*;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};

use unit_command::constants::*;
use unit_command::economy::{EconomyPlugin, SpawnRequest, Treasury};
use unit_command::movement::Motion;
use unit_command::selection::SelectionState;
use unit_command::types::RtsCamera;
use unit_command::{agent_bundle, Agent, CommandCorePlugin, DamageRequest, Health, PointerInputPlugin, Selected, UnitClass};

const SELECTION_COLOR: Color = Color::srgb(0.2, 1.0, 0.3);
const DRAG_COLOR: Color = Color::srgba(0.2, 1.0, 0.3, 0.6);
const ORDER_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const HEALTH_COLOR: Color = Color::srgb(0.3, 0.9, 0.3);
const HIT_DAMAGE: f32 = 40.0;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Unit Command".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins((CommandCorePlugin, PointerInputPlugin, EconomyPlugin))
        .add_systems(Startup, (setup_camera, spawn_roster))
        .add_systems(Update, (
            rts_camera_movement,
            request_spawns,
            damage_selected,
            draw_agents,
            draw_orders,
            draw_drag_region,
            update_title,
        ))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scale: CAMERA_INITIAL_SCALE,
            ..OrthographicProjection::default_2d()
        }),
        RtsCamera,
    ));

    info!("Left click / drag to select, double click for class, right click to move");
    info!("S stops, P patrols to the cursor, 1/2/3 buy units, K hurts the selection, arrows pan, wheel zooms");
}

/// Three loose squads, one per class
fn spawn_roster(mut commands: Commands) {
    for (row, class) in UnitClass::ALL.into_iter().enumerate() {
        for column in 0..5 {
            let at = Vec2::new(-6.0 + column as f32 * 2.5, 4.0 - row as f32 * 4.0);
            commands.spawn(agent_bundle(Agent::of_class(class), at));
        }
    }
    info!("Spawned starting roster of {} units", UnitClass::ALL.len() * 5);
}

fn rts_camera_movement(
    time: Res<Time>,
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<RtsCamera>>,
) {
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else { return };
    let Projection::Orthographic(ortho) = &mut *projection else { return };

    let mut movement = Vec2::ZERO;
    if keyboard_input.pressed(KeyCode::ArrowUp) {
        movement.y += 1.0;
    }
    if keyboard_input.pressed(KeyCode::ArrowDown) {
        movement.y -= 1.0;
    }
    if keyboard_input.pressed(KeyCode::ArrowLeft) {
        movement.x -= 1.0;
    }
    if keyboard_input.pressed(KeyCode::ArrowRight) {
        movement.x += 1.0;
    }

    if movement != Vec2::ZERO {
        // Pan faster when zoomed out
        let speed = CAMERA_SPEED * ortho.scale / CAMERA_INITIAL_SCALE;
        let step = movement.normalize() * speed * time.delta_secs();
        transform.translation.x += step.x;
        transform.translation.y += step.y;
    }

    for scroll in scroll_events.read() {
        let zoom_delta = match scroll.unit {
            MouseScrollUnit::Line => scroll.y * CAMERA_ZOOM_SPEED,
            MouseScrollUnit::Pixel => scroll.y * CAMERA_ZOOM_SPEED * 0.01,
        };
        ortho.scale = (ortho.scale * (1.0 - zoom_delta)).clamp(CAMERA_MIN_SCALE, CAMERA_MAX_SCALE);
    }
}

/// Keys 1/2/3 buy a unit of the matching class at the camera centre
fn request_spawns(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    camera_query: Query<&Transform, With<RtsCamera>>,
    mut requests: EventWriter<SpawnRequest>,
) {
    let Ok(camera) = camera_query.single() else { return };
    let at = camera.translation.truncate();

    let keys = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];
    for (key, class) in keys.into_iter().zip(UnitClass::ALL) {
        if keyboard_input.just_pressed(key) {
            requests.write(SpawnRequest { class, at });
        }
    }
}

/// K deals a fixed hit to every selected unit
fn damage_selected(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    selection: Res<SelectionState>,
    mut hits: EventWriter<DamageRequest>,
) {
    if !keyboard_input.just_pressed(KeyCode::KeyK) {
        return;
    }
    for &target in selection.selected_agents() {
        hits.write(DamageRequest { target, amount: HIT_DAMAGE });
    }
}

fn class_color(class: UnitClass) -> Color {
    match class {
        UnitClass::Infantry => Color::srgb(0.3, 0.6, 1.0),
        UnitClass::Ranger => Color::srgb(1.0, 0.8, 0.2),
        UnitClass::Heavy => Color::srgb(0.9, 0.3, 0.3),
    }
}

fn draw_agents(
    mut gizmos: Gizmos,
    agents: Query<(&Agent, &Transform, &Health, Has<Selected>)>,
) {
    for (agent, transform, health, selected) in agents.iter() {
        let at = transform.translation.truncate();
        gizmos.circle_2d(at, agent.radius, class_color(agent.class));
        // Health bar above the unit
        let left = at + Vec2::new(-agent.radius, agent.radius + 0.2);
        let width = agent.radius * 2.0 * health.health_percentage();
        gizmos.line_2d(left, left + Vec2::X * width, HEALTH_COLOR);
        if selected {
            gizmos.circle_2d(at, agent.radius + 0.15, SELECTION_COLOR);
        }
    }
}

/// Move targets and patrol legs of selected agents
fn draw_orders(
    mut gizmos: Gizmos,
    agents: Query<(&Transform, &Motion), With<Selected>>,
) {
    for (transform, motion) in agents.iter() {
        let at = transform.translation.truncate();
        match motion {
            Motion::Idle => {}
            Motion::Moving { target } => {
                gizmos.line_2d(at, *target, ORDER_COLOR);
                gizmos.circle_2d(*target, 0.1, ORDER_COLOR);
            }
            Motion::Patrolling(route) => {
                gizmos.line_2d(route.origin, route.target, ORDER_COLOR);
                gizmos.circle_2d(route.origin, 0.15, ORDER_COLOR);
                gizmos.circle_2d(route.target, 0.15, ORDER_COLOR);
            }
        }
    }
}

fn draw_drag_region(mut gizmos: Gizmos, selection: Res<SelectionState>) {
    let Some(drag) = selection.drag else { return };
    if drag.extent() <= 0.0 {
        return;
    }
    let (min, max) = drag.bounds();
    gizmos.rect_2d((min + max) / 2.0, max - min, DRAG_COLOR);
}

fn update_title(treasury: Res<Treasury>, selection: Res<SelectionState>, mut windows: Query<&mut Window>) {
    if !treasury.is_changed() && !selection.is_changed() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else { return };
    window.title = format!(
        "Unit Command | funds {:.1}/{:.0} | {} selected",
        treasury.balance,
        treasury.cap,
        selection.selected_count()
    );
}
