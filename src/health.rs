//! Unit health, defence-reduced damage and death.
//!
//! Dead agents are despawned; the selection drops them through the usual
//! removed-component pruning.

use bevy::prelude::*;

use crate::types::{Agent, UnitClass};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    /// Flat reduction applied to every hit
    pub defence: f32,
}

impl Health {
    pub fn new(max_health: f32, defence: f32) -> Self {
        Self { current: max_health, max: max_health, defence }
    }

    pub fn of_class(class: UnitClass) -> Self {
        Self::new(class.max_health(), class.defence())
    }

    /// Apply a hit and return the damage actually taken. Every hit on a living
    /// unit costs at least 1 point; hits on the dead are ignored.
    pub fn take_damage(&mut self, damage: f32) -> f32 {
        if self.is_dead() {
            return 0.0;
        }
        let actual = (damage - self.defence).max(1.0);
        self.current = (self.current - actual).clamp(0.0, self.max);
        actual
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_dead() {
            return;
        }
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn health_percentage(&self) -> f32 {
        self.current / self.max
    }
}

/// A hit on one agent from an external source (combat, scripted events)
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Raised once for every agent that dies, just before it is despawned
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct UnitDied {
    pub entity: Entity,
    pub class: UnitClass,
}

/// System: apply queued hits
pub fn apply_damage(
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<&mut Health>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            debug!("Damage for missing {:?} dropped", request.target);
            continue;
        };
        let taken = health.take_damage(request.amount);
        debug!(
            "{:?} took {:.1} damage, {:.1}/{:.1} left",
            request.target, taken, health.current, health.max
        );
    }
}

/// System: despawn agents whose health reached zero
pub fn despawn_dead_agents(
    mut commands: Commands,
    agents: Query<(Entity, &Agent, &Health)>,
    mut deaths: EventWriter<UnitDied>,
) {
    for (entity, agent, health) in agents.iter() {
        if !health.is_dead() {
            continue;
        }
        info!("{} {:?} died", agent.class.name(), entity);
        deaths.write(UnitDied { entity, class: agent.class });
        commands.entity(entity).despawn();
    }
}
