//! Spend-then-spawn interface to the resource economy.
//!
//! The treasury fills slowly up to a cap; a spawn request succeeds only if the
//! class cost can be paid, and the new agent appears scattered around the request point.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::constants::*;
use crate::error::OrderRejection;
use crate::types::{agent_bundle, Agent, UnitClass};

#[derive(Resource, Clone, Debug)]
pub struct Treasury {
    pub balance: f32,
    pub cap: f32,
    /// Seconds it takes to earn one point
    pub income_interval: f32,
}

impl Default for Treasury {
    fn default() -> Self {
        Self {
            balance: TREASURY_START,
            cap: TREASURY_CAP,
            income_interval: TREASURY_INCOME_INTERVAL,
        }
    }
}

impl Treasury {
    pub fn can_spend(&self, cost: u32) -> bool {
        self.balance >= cost as f32
    }

    pub fn try_spend(&mut self, cost: u32) -> Result<(), OrderRejection> {
        if !self.can_spend(cost) {
            return Err(OrderRejection::InsufficientFunds { cost, balance: self.balance });
        }
        self.balance -= cost as f32;
        Ok(())
    }

    pub fn accrue(&mut self, seconds: f32) {
        if self.income_interval <= 0.0 {
            return;
        }
        self.balance = (self.balance + seconds / self.income_interval).min(self.cap);
    }
}

/// Request to buy and spawn one agent of `class` near `at`
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    pub class: UnitClass,
    pub at: Vec2,
}

/// Uniformly distributed offset inside a disc of `radius`
pub fn scatter_offset(rng: &mut impl Rng, radius: f32) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = radius * rng.gen::<f32>().sqrt();
    Vec2::new(angle.cos(), angle.sin()) * distance
}

/// System: earn income over time
pub fn accrue_income(time: Res<Time>, mut treasury: ResMut<Treasury>) {
    treasury.accrue(time.delta_secs());
}

/// System: pay for and spawn requested agents
pub fn spawn_requested_agents(
    mut commands: Commands,
    mut requests: EventReader<SpawnRequest>,
    mut treasury: ResMut<Treasury>,
) {
    let mut rng = rand::thread_rng();

    for request in requests.read() {
        let class = request.class;
        if let Err(rejection) = treasury.try_spend(class.cost()) {
            info!("Cannot spawn {}: {}", class.name(), rejection);
            continue;
        }

        let at = request.at + scatter_offset(&mut rng, SPAWN_RADIUS);
        let entity = commands.spawn(agent_bundle(Agent::of_class(class), at)).id();
        info!(
            "Spawned {} {:?} at ({:.1}, {:.1}), {:.1} left",
            class.name(), entity, at.x, at.y, treasury.balance
        );
    }
}

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Treasury>()
            .add_event::<SpawnRequest>()
            .add_systems(Update, (
                accrue_income,
                spawn_requested_agents,
            ).chain().before(crate::CommandSet::Motion));
    }
}
