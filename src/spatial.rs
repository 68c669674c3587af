//! Agent registry and spatial queries.
//!
//! The index is rebuilt from the ECS once per tick and is the only thing the
//! selection and destination logic read agent positions from.

use bevy::prelude::*;
use std::collections::HashMap;

use crate::constants::INDEX_CELL_SIZE;
use crate::math_utils::normalized_bounds;
use crate::types::{Agent, UnitClass};

/// Snapshot of one live agent as seen by spatial queries
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexedAgent {
    pub entity: Entity,
    pub position: Vec2,
    pub depth: f32, // Draw depth, higher is on top
    pub radius: f32,
    pub class: UnitClass,
}

impl IndexedAgent {
    pub fn new(entity: Entity, agent: &Agent, transform: &Transform) -> Self {
        Self {
            entity,
            position: transform.translation.truncate(),
            depth: transform.translation.z,
            radius: agent.radius,
            class: agent.class,
        }
    }
}

/// Explicit registry of live agents, bucketed into a uniform grid
#[derive(Resource, Default, Debug)]
pub struct AgentIndex {
    agents: Vec<IndexedAgent>,
    slots: HashMap<Entity, usize>,
    cells: HashMap<(i32, i32), Vec<usize>>,
    max_radius: f32,
}

impl AgentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.agents.clear();
        self.slots.clear();
        self.cells.clear();
        self.max_radius = 0.0;
    }

    /// Replace the contents with `agents`, stored in entity order so queries are deterministic
    pub fn rebuild(&mut self, agents: impl IntoIterator<Item = IndexedAgent>) {
        self.clear();
        let mut sorted: Vec<IndexedAgent> = agents.into_iter().collect();
        sorted.sort_by_key(|a| a.entity);
        for agent in sorted {
            self.insert(agent);
        }
    }

    pub fn insert(&mut self, agent: IndexedAgent) {
        if self.slots.contains_key(&agent.entity) {
            return;
        }
        let slot = self.agents.len();
        self.slots.insert(agent.entity, slot);
        self.cells.entry(Self::world_to_cell(agent.position)).or_default().push(slot);
        self.max_radius = self.max_radius.max(agent.radius);
        self.agents.push(agent);
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, entity: Entity) -> Option<&IndexedAgent> {
        self.slots.get(&entity).map(|&slot| &self.agents[slot])
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.slots.contains_key(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedAgent> {
        self.agents.iter()
    }

    pub fn world_to_cell(pos: Vec2) -> (i32, i32) {
        (
            (pos.x / INDEX_CELL_SIZE).floor() as i32,
            (pos.y / INDEX_CELL_SIZE).floor() as i32,
        )
    }

    /// Slots of every agent bucketed in a cell touching the box `min..=max`
    fn slots_near(&self, min: Vec2, max: Vec2) -> Vec<usize> {
        let (min_x, min_y) = Self::world_to_cell(min);
        let (max_x, max_y) = Self::world_to_cell(max);

        // A huge box would walk mostly empty cells. Far coordinates saturate to the
        // i32 range, so spans are widened before subtracting.
        let span = |lo: i32, hi: i32| hi as i64 - lo as i64 + 1;
        let cell_count = span(min_x, max_x).saturating_mul(span(min_y, max_y));
        if cell_count > self.cells.len() as i64 {
            return (0..self.agents.len()).collect();
        }

        let mut slots = Vec::new();
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                if let Some(cell) = self.cells.get(&(x, y)) {
                    slots.extend(cell);
                }
            }
        }
        slots
    }

    /// Topmost agent whose collision circle contains `position`
    pub fn point_query(&self, position: Vec2) -> Option<Entity> {
        let reach = Vec2::splat(self.max_radius);
        self.slots_near(position - reach, position + reach)
            .into_iter()
            .map(|slot| &self.agents[slot])
            .filter(|a| a.position.distance(position) <= a.radius)
            .max_by(|a, b| {
                a.depth
                    .partial_cmp(&b.depth)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.entity.cmp(&b.entity))
            })
            .map(|a| a.entity)
    }

    /// Every agent whose position lies inside the rectangle spanned by the two corners (inclusive)
    pub fn rect_query(&self, corner_a: Vec2, corner_b: Vec2) -> Vec<Entity> {
        let (min, max) = normalized_bounds(corner_a, corner_b);
        let mut slots: Vec<usize> = self
            .slots_near(min, max)
            .into_iter()
            .filter(|&slot| {
                let p = self.agents[slot].position;
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            })
            .collect();
        slots.sort_unstable();
        slots.into_iter().map(|slot| self.agents[slot].entity).collect()
    }

    /// True if a probe circle of `probe_radius` at `position` overlaps any agent other than `excluding`.
    /// Touching circles do not count; a zero probe is a plain point-in-circle test.
    pub fn is_occupied(&self, position: Vec2, probe_radius: f32, excluding: Option<Entity>) -> bool {
        let reach = Vec2::splat(self.max_radius + probe_radius);
        self.slots_near(position - reach, position + reach)
            .into_iter()
            .map(|slot| &self.agents[slot])
            .filter(|a| Some(a.entity) != excluding)
            .any(|a| a.position.distance(position) < a.radius + probe_radius)
    }

    /// Every live agent of `class`, in index order
    pub fn agents_of_class(&self, class: UnitClass) -> Vec<Entity> {
        self.agents.iter().filter(|a| a.class == class).map(|a| a.entity).collect()
    }
}

/// System: refresh the agent index from the world
pub fn rebuild_agent_index(
    mut index: ResMut<AgentIndex>,
    agents: Query<(Entity, &Agent, &Transform)>,
) {
    index.rebuild(agents.iter().map(|(entity, agent, transform)| IndexedAgent::new(entity, agent, transform)));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entity(n: u32) -> Entity {
        Entity::from_raw(n)
    }

    pub(crate) fn indexed(n: u32, x: f32, y: f32, radius: f32, class: UnitClass) -> IndexedAgent {
        IndexedAgent {
            entity: entity(n),
            position: Vec2::new(x, y),
            depth: 0.0,
            radius,
            class,
        }
    }

    fn sample_index() -> AgentIndex {
        let mut index = AgentIndex::new();
        index.rebuild([
            indexed(1, 0.0, 0.0, 0.5, UnitClass::Infantry),
            indexed(2, 3.0, 3.0, 0.5, UnitClass::Infantry),
            indexed(3, -7.5, 2.0, 0.7, UnitClass::Heavy),
            indexed(4, 12.0, -9.0, 0.4, UnitClass::Ranger),
        ]);
        index
    }

    #[test]
    fn point_query_hits_inside_radius() {
        let index = sample_index();
        assert_eq!(index.point_query(Vec2::new(0.3, 0.2)), Some(entity(1)));
        assert_eq!(index.point_query(Vec2::new(-7.0, 2.4)), Some(entity(3)));
        assert_eq!(index.point_query(Vec2::new(1.5, 1.5)), None);
    }

    #[test]
    fn point_query_prefers_topmost() {
        let mut index = AgentIndex::new();
        let mut low = indexed(1, 0.0, 0.0, 1.0, UnitClass::Infantry);
        low.depth = 2.0;
        let high = IndexedAgent { depth: 5.0, ..indexed(2, 0.5, 0.0, 1.0, UnitClass::Heavy) };
        index.rebuild([high, low]);
        assert_eq!(index.point_query(Vec2::new(0.25, 0.0)), Some(entity(2)));
    }

    #[test]
    fn point_query_ties_go_to_later_entity() {
        let mut index = AgentIndex::new();
        index.rebuild([
            indexed(7, 0.0, 0.0, 1.0, UnitClass::Infantry),
            indexed(3, 0.2, 0.0, 1.0, UnitClass::Infantry),
        ]);
        assert_eq!(index.point_query(Vec2::new(0.1, 0.0)), Some(entity(7)));
    }

    #[test]
    fn rect_query_is_corner_order_independent() {
        let index = sample_index();
        let forward = index.rect_query(Vec2::new(-1.0, -1.0), Vec2::new(3.0, 3.0));
        let backward = index.rect_query(Vec2::new(3.0, 3.0), Vec2::new(-1.0, -1.0));
        let crossed = index.rect_query(Vec2::new(-1.0, 3.0), Vec2::new(3.0, -1.0));
        assert_eq!(forward, vec![entity(1), entity(2)]);
        assert_eq!(forward, backward);
        assert_eq!(forward, crossed);
    }

    #[test]
    fn rect_query_boundary_is_inclusive() {
        let index = sample_index();
        assert_eq!(index.rect_query(Vec2::new(3.0, 3.0), Vec2::new(5.0, 5.0)), vec![entity(2)]);
    }

    #[test]
    fn rect_query_spanning_far_cells() {
        let index = sample_index();
        let all = index.rect_query(Vec2::new(-1000.0, -1000.0), Vec2::new(1000.0, 1000.0));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn queries_beyond_the_cell_range() {
        let index = sample_index();
        // Cells saturate at the i32 limits on both sides
        let all = index.rect_query(Vec2::splat(-1.0e10), Vec2::splat(1.0e10));
        assert_eq!(all.len(), 4);
        assert!(index.rect_query(Vec2::new(9.0e9, -1.0e10), Vec2::new(1.0e10, 1.0e10)).is_empty());
        assert_eq!(index.point_query(Vec2::new(-1.0e10, 0.0)), None);
        assert!(!index.is_occupied(Vec2::new(9.0e9, 0.0), 0.5, None));
    }

    #[test]
    fn occupancy_excludes_self() {
        let index = sample_index();
        let at_one = Vec2::new(0.0, 0.0);
        assert!(index.is_occupied(at_one, 0.0, None));
        assert!(!index.is_occupied(at_one, 0.0, Some(entity(1))));
    }

    #[test]
    fn occupancy_uses_probe_radius() {
        let index = sample_index();
        // 0.8 from agent 1 (radius 0.5): clear as a point, blocked for a 0.5 probe
        let p = Vec2::new(0.8, 0.0);
        assert!(!index.is_occupied(p, 0.0, None));
        assert!(index.is_occupied(p, 0.5, None));
        // Exactly touching does not count
        assert!(!index.is_occupied(Vec2::new(1.0, 0.0), 0.5, None));
    }

    #[test]
    fn occupancy_across_cell_borders() {
        let mut index = AgentIndex::new();
        // Agent sits just left of a cell boundary, probe just right of it
        index.rebuild([indexed(1, INDEX_CELL_SIZE - 0.1, 0.0, 0.5, UnitClass::Infantry)]);
        assert!(index.is_occupied(Vec2::new(INDEX_CELL_SIZE + 0.2, 0.0), 0.0, None));
    }

    #[test]
    fn class_lookup_and_slots() {
        let index = sample_index();
        assert_eq!(index.agents_of_class(UnitClass::Infantry), vec![entity(1), entity(2)]);
        assert_eq!(index.len(), 4);
        assert!(index.contains(entity(3)));
        assert!(index.get(entity(9)).is_none());
        assert_eq!(index.get(entity(4)).map(|a| a.position), Some(Vec2::new(12.0, -9.0)));
    }
}
