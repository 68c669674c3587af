// Tunables shared by the selection, resolver and movement systems
use bevy::prelude::*;
use crate::constants::*;

/// Runtime configuration for the command core.
///
/// Insert a customised copy before adding [`crate::CommandCorePlugin`] to override the defaults.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct CommandConfig {
    /// Max seconds between two clicks for the second one to count as a double click
    pub double_click_window: f64,
    /// World distance a primary press must travel before its release counts as a drag
    pub drag_threshold: f32,
    /// Ring formation spacing constant
    pub formation_spacing: f32,
    /// Moving agents snap to their target once within this distance
    pub arrival_tolerance: f32,
    /// Seconds a patrolling agent waits at each endpoint
    pub patrol_wait: f32,
    pub ring_search_rings: u32,
    pub ring_search_samples: u32,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            double_click_window: DOUBLE_CLICK_WINDOW,
            drag_threshold: DRAG_SELECT_THRESHOLD,
            formation_spacing: FORMATION_SPACING,
            arrival_tolerance: ARRIVAL_TOLERANCE,
            patrol_wait: PATROL_WAIT_TIME,
            ring_search_rings: RING_SEARCH_RINGS,
            ring_search_samples: RING_SEARCH_SAMPLES,
        }
    }
}
