// Selection module - click, double-click and box selection of agents
//
// Submodules:
// - state: SelectionState resource and the selection rules
// - input: Pointer/keyboard translation and the input -> selection/order system
// - systems: Despawn pruning and Selected marker sync
// - utils: Shared utility functions

mod state;
mod input;
mod systems;
pub mod utils;

// Re-export main types for external use
pub use state::{ClickOutcome, DragRegion, SelectionState};
pub use input::CommandInput;

// Re-export systems for the plugins
pub use input::{apply_selection_input, read_pointer_input};
pub use systems::{prune_despawned_agents, sync_selected_markers};
