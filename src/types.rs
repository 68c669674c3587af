use bevy::prelude::*;

use crate::health::Health;
use crate::movement::Motion;

/// Unit archetypes. Double-click selection groups agents by class.
#[derive(Component, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum UnitClass {
    Infantry,
    Ranger,
    Heavy,
}

impl UnitClass {
    pub const ALL: [UnitClass; 3] = [UnitClass::Infantry, UnitClass::Ranger, UnitClass::Heavy];

    pub fn name(self) -> &'static str {
        match self {
            UnitClass::Infantry => "Infantry",
            UnitClass::Ranger => "Ranger",
            UnitClass::Heavy => "Heavy",
        }
    }

    /// Treasury cost to spawn one unit of this class
    pub fn cost(self) -> u32 {
        match self {
            UnitClass::Infantry => 2,
            UnitClass::Ranger => 3,
            UnitClass::Heavy => 5,
        }
    }

    /// Movement speed in world units per second
    pub fn speed(self) -> f32 {
        match self {
            UnitClass::Infantry => 5.0,
            UnitClass::Ranger => 6.0,
            UnitClass::Heavy => 3.0,
        }
    }

    pub fn collision_radius(self) -> f32 {
        match self {
            UnitClass::Infantry => 0.5,
            UnitClass::Ranger => 0.4,
            UnitClass::Heavy => 0.7,
        }
    }

    pub fn max_health(self) -> f32 {
        match self {
            UnitClass::Infantry => 100.0,
            UnitClass::Ranger => 70.0,
            UnitClass::Heavy => 160.0,
        }
    }

    /// Flat damage reduction per hit
    pub fn defence(self) -> f32 {
        match self {
            UnitClass::Infantry => 2.0,
            UnitClass::Ranger => 1.0,
            UnitClass::Heavy => 5.0,
        }
    }
}

/// A selectable, movable unit. Position lives in the entity's `Transform` (x, y);
/// `translation.z` is draw depth and decides which agent is on top for click tests.
#[derive(Component, Clone, Copy, Debug)]
#[require(Transform, Motion)]
pub struct Agent {
    pub class: UnitClass,
    pub speed: f32,
    pub radius: f32,
}

impl Agent {
    pub fn new(class: UnitClass, speed: f32, radius: f32) -> Self {
        debug_assert!(speed > 0.0 && radius > 0.0);
        Self { class, speed, radius }
    }

    pub fn of_class(class: UnitClass) -> Self {
        Self::new(class, class.speed(), class.collision_radius())
    }
}

/// Everything needed to spawn an agent at a ground position, at full health
pub fn agent_bundle(agent: Agent, at: Vec2) -> impl Bundle {
    (agent, Health::of_class(agent.class), Transform::from_translation(at.extend(0.0)))
}

/// Marker mirrored from the selection set each tick, for presentation queries
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Selected;

#[derive(Component)]
pub struct RtsCamera;
