// Bookkeeping systems that keep the selection consistent with the world
use bevy::prelude::*;

use crate::types::{Agent, Selected};

use super::state::SelectionState;

/// System: drop despawned agents from the selection
pub fn prune_despawned_agents(
    mut removed: RemovedComponents<Agent>,
    mut selection_state: ResMut<SelectionState>,
) {
    for entity in removed.read() {
        if selection_state.is_selected(entity) {
            selection_state.remove(entity);
            debug!("Pruned despawned {:?} from selection", entity);
        }
    }
}

/// System: mirror selection membership into the `Selected` marker
pub fn sync_selected_markers(
    mut commands: Commands,
    selection_state: Res<SelectionState>,
    agents: Query<(Entity, Has<Selected>), With<Agent>>,
) {
    if !selection_state.is_changed() {
        return;
    }

    for (entity, marked) in agents.iter() {
        let selected = selection_state.is_selected(entity);
        if selected && !marked {
            commands.entity(entity).insert(Selected);
        } else if !selected && marked {
            commands.entity(entity).remove::<Selected>();
        }
    }
}
