// Destination resolution: free-spot search for single moves, slot assignment for group moves
use bevy::prelude::*;

use crate::config::CommandConfig;
use crate::error::OrderRejection;
use crate::formation::ring_formation;
use crate::math_utils::point_on_circle;
use crate::spatial::{AgentIndex, IndexedAgent};

/// One agent paired with the formation point it should move to
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Assignment {
    pub entity: Entity,
    pub destination: Vec2,
}

/// Nearest point to `desired` where `mover` would not overlap another agent.
///
/// Searches rings of radius `ring * 2 * mover.radius` outward, sampling evenly spaced
/// angles from 0. When every sample is taken the desired point is returned as-is.
pub fn resolve_single(index: &AgentIndex, mover: &IndexedAgent, desired: Vec2, config: &CommandConfig) -> Vec2 {
    let occupied = |p: Vec2| index.is_occupied(p, mover.radius, Some(mover.entity));

    if !occupied(desired) {
        return desired;
    }

    let step = mover.radius * 2.0;
    let samples = config.ring_search_samples.max(1);
    for ring in 1..=config.ring_search_rings {
        let ring_radius = ring as f32 * step;
        for i in 0..samples {
            let angle = i as f32 * 360.0 / samples as f32;
            let candidate = point_on_circle(desired, ring_radius, angle);
            if !occupied(candidate) {
                return candidate;
            }
        }
    }

    warn!(
        "No free spot near ({:.1}, {:.1}) for {:?}, moving to the occupied point",
        desired.x, desired.y, mover.entity
    );
    desired
}

/// Assign each agent a point of the ring formation around `target`.
///
/// Greedy: agents are served in the given order and each takes the nearest point still
/// unclaimed (ties go to the lower formation index). Handles missing from the index are skipped.
pub fn resolve_group(
    index: &AgentIndex,
    target: Vec2,
    agents: &[Entity],
    spacing: f32,
) -> Result<Vec<Assignment>, OrderRejection> {
    let live: Vec<&IndexedAgent> = agents
        .iter()
        .filter_map(|&entity| {
            let found = index.get(entity);
            if found.is_none() {
                debug!("{}", OrderRejection::StaleReference(entity));
            }
            found
        })
        .collect();

    if live.is_empty() {
        return Err(OrderRejection::EmptySelection);
    }

    let slots = ring_formation(target, live.len(), spacing)?;
    let mut claimed = vec![false; slots.len()];
    let mut assignments = Vec::with_capacity(live.len());

    for agent in live {
        let mut best_slot = None;
        let mut best_distance = f32::MAX;

        for (slot, &point) in slots.iter().enumerate() {
            if claimed[slot] {
                continue;
            }
            let distance = agent.position.distance(point);
            if distance < best_distance {
                best_distance = distance;
                best_slot = Some(slot);
            }
        }

        if let Some(slot) = best_slot {
            claimed[slot] = true;
            assignments.push(Assignment { entity: agent.entity, destination: slots[slot] });
        }
    }

    Ok(assignments)
}
