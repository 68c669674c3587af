//! Selection and movement core for RTS-style unit control on a 2D plane.
//!
//! Players pick agents by click, double-click (whole class) or box drag, then issue
//! move, stop and patrol orders. Group moves spread agents over a ring formation,
//! single moves search for a free spot near the clicked point.
//!
//! [`CommandCorePlugin`] holds the simulation side and only consumes
//! [`selection::CommandInput`] events; [`PointerInputPlugin`] produces them from a window,
//! mouse and keyboard.

use bevy::prelude::*;

pub mod commands;
pub mod config;
pub mod constants;
pub mod destination;
pub mod economy;
pub mod error;
pub mod formation;
pub mod health;
pub mod math_utils;
pub mod movement;
pub mod selection;
pub mod spatial;
pub mod types;


pub use commands::UnitOrder;
pub use config::CommandConfig;
pub use error::OrderRejection;
pub use health::{DamageRequest, Health, UnitDied};
pub use movement::Motion;
pub use selection::{CommandInput, SelectionState};
pub use spatial::AgentIndex;
pub use types::{agent_bundle, Agent, Selected, UnitClass};

/// Per-tick ordering of the command core. Motion (which also settles damage and
/// deaths) runs first, so an order issued during a tick starts moving agents on the
/// following one.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandSet {
    Motion,
    Index,
    Input,
    Selection,
    Orders,
    Sync,
}

pub struct CommandCorePlugin;

impl Plugin for CommandCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandConfig>()
            .init_resource::<AgentIndex>()
            .init_resource::<SelectionState>()
            .add_event::<CommandInput>()
            .add_event::<UnitOrder>()
            .add_event::<DamageRequest>()
            .add_event::<UnitDied>()
            .configure_sets(Update, (
                CommandSet::Motion,
                CommandSet::Index,
                CommandSet::Input,
                CommandSet::Selection,
                CommandSet::Orders,
                CommandSet::Sync,
            ).chain())
            .add_systems(Update, (
                // Deaths land before the index rebuild, so the dead are pruned the same tick
                (movement::advance_motion, health::apply_damage, health::despawn_dead_agents)
                    .chain()
                    .in_set(CommandSet::Motion),
                (spatial::rebuild_agent_index, selection::prune_despawned_agents)
                    .chain()
                    .in_set(CommandSet::Index),
                selection::apply_selection_input.in_set(CommandSet::Selection),
                commands::dispatch_orders.in_set(CommandSet::Orders),
                selection::sync_selected_markers.in_set(CommandSet::Sync),
            ));
    }
}

/// Feeds [`CommandInput`] from the primary window's cursor, mouse buttons and keys
pub struct PointerInputPlugin;

impl Plugin for PointerInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, selection::read_pointer_input.in_set(CommandSet::Input));
    }
}
