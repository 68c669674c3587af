// Selection state and the click / double-click / drag rules applied to it
use bevy::prelude::*;

use crate::config::CommandConfig;
use crate::spatial::AgentIndex;

/// Transient rectangle of an in-progress drag gesture (world space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragRegion {
    pub start: Vec2,
    pub current: Vec2,
}

impl DragRegion {
    pub fn new(start: Vec2) -> Self {
        Self { start, current: start }
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        crate::math_utils::normalized_bounds(self.start, self.current)
    }

    /// Largest distance the pointer has travelled on either axis
    pub fn extent(&self) -> f32 {
        let span = (self.current - self.start).abs();
        span.x.max(span.y)
    }
}

/// What a click did to the selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Entity),
    Added(Entity),
    SelectedClass { anchor: Entity, count: usize },
    Cleared,
    Unchanged,
}

/// Selection state resource - the set of selected agents (Vec preserves selection order)
#[derive(Resource, Default, Debug)]
pub struct SelectionState {
    selected: Vec<Entity>,
    last_click_at: Option<f64>, // Elapsed seconds of the previous primary click
    pub drag: Option<DragRegion>,
}

impl SelectionState {
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selected.contains(&entity)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_agents(&self) -> &[Entity] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Add to the set; returns false if already present
    pub fn add(&mut self, entity: Entity) -> bool {
        if self.selected.contains(&entity) {
            return false;
        }
        self.selected.push(entity);
        true
    }

    pub fn remove(&mut self, entity: Entity) -> bool {
        let before = self.selected.len();
        self.selected.retain(|&e| e != entity);
        self.selected.len() != before
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop handles the index no longer knows about; returns how many were pruned
    pub fn retain_live(&mut self, index: &AgentIndex) -> usize {
        let before = self.selected.len();
        self.selected.retain(|&e| index.contains(e));
        before - self.selected.len()
    }

    /// Primary click at `point`. `now` is elapsed seconds, used for double-click detection.
    pub fn click(
        &mut self,
        index: &AgentIndex,
        point: Vec2,
        additive: bool,
        now: f64,
        config: &CommandConfig,
    ) -> ClickOutcome {
        let hit = index.point_query(point);
        let is_double = self
            .last_click_at
            .is_some_and(|last| now - last <= config.double_click_window);
        self.last_click_at = Some(now);

        match hit {
            Some(anchor) if is_double => {
                // Double click wins over single-click handling
                let Some(class) = index.get(anchor).map(|a| a.class) else {
                    return ClickOutcome::Unchanged;
                };
                self.selected = index.agents_of_class(class);
                ClickOutcome::SelectedClass { anchor, count: self.selected.len() }
            }
            Some(entity) if additive => {
                if self.add(entity) {
                    ClickOutcome::Added(entity)
                } else {
                    ClickOutcome::Unchanged
                }
            }
            Some(entity) => {
                self.selected.clear();
                self.selected.push(entity);
                ClickOutcome::Selected(entity)
            }
            None if additive => ClickOutcome::Unchanged,
            None => {
                self.selected.clear();
                ClickOutcome::Cleared
            }
        }
    }

    pub fn begin_drag(&mut self, point: Vec2) {
        self.drag = Some(DragRegion::new(point));
    }

    pub fn update_drag(&mut self, point: Vec2) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = point;
        }
    }

    /// End the drag gesture at `point`. If it travelled past the drag threshold, the
    /// selection becomes exactly the agents inside the rectangle and their count is returned.
    pub fn finish_drag(&mut self, index: &AgentIndex, point: Vec2, config: &CommandConfig) -> Option<usize> {
        let mut drag = self.drag.take()?;
        drag.current = point;
        if drag.extent() < config.drag_threshold {
            return None;
        }
        self.selected = index.rect_query(drag.start, drag.current);
        Some(self.selected.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::tests::{entity, indexed};
    use crate::types::UnitClass;

    fn field() -> AgentIndex {
        let mut index = AgentIndex::new();
        index.rebuild([
            indexed(1, 0.0, 0.0, 0.5, UnitClass::Infantry),
            indexed(2, 4.0, 0.0, 0.5, UnitClass::Infantry),
            indexed(3, 8.0, 0.0, 0.7, UnitClass::Heavy),
            indexed(4, 0.0, 6.0, 0.4, UnitClass::Ranger),
            indexed(5, 9.0, 9.0, 0.5, UnitClass::Infantry),
        ]);
        index
    }

    #[test]
    fn click_on_agent_replaces_selection() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.click(&index, Vec2::new(0.1, 0.0), false, 0.0, &config);
        let outcome = state.click(&index, Vec2::new(4.0, 0.2), false, 1.0, &config);
        assert_eq!(outcome, ClickOutcome::Selected(entity(2)));
        assert_eq!(state.selected_agents(), &[entity(2)]);
    }

    #[test]
    fn additive_click_accumulates_without_duplicates() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.click(&index, Vec2::new(0.0, 0.0), false, 0.0, &config);
        state.click(&index, Vec2::new(8.0, 0.0), true, 1.0, &config);
        let again = state.click(&index, Vec2::new(8.0, 0.0), true, 2.0, &config);
        assert_eq!(again, ClickOutcome::Unchanged);
        assert_eq!(state.selected_agents(), &[entity(1), entity(3)]);
    }

    #[test]
    fn empty_click_clears_unless_additive() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.click(&index, Vec2::new(0.0, 0.0), false, 0.0, &config);
        state.click(&index, Vec2::new(4.0, 0.0), true, 1.0, &config);

        assert_eq!(state.click(&index, Vec2::new(20.0, 20.0), true, 2.0, &config), ClickOutcome::Unchanged);
        assert_eq!(state.selected_count(), 2);

        assert_eq!(state.click(&index, Vec2::new(20.0, 20.0), false, 3.0, &config), ClickOutcome::Cleared);
        assert_eq!(state.selected_count(), 0);
    }

    #[test]
    fn double_click_selects_whole_class() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.add(entity(3));
        state.click(&index, Vec2::new(4.0, 0.0), false, 10.0, &config);
        let outcome = state.click(&index, Vec2::new(4.0, 0.0), false, 10.2, &config);
        assert_eq!(outcome, ClickOutcome::SelectedClass { anchor: entity(2), count: 3 });
        assert_eq!(state.selected_agents(), &[entity(1), entity(2), entity(5)]);
        assert!(!state.is_selected(entity(3)));
    }

    #[test]
    fn double_click_window_counts_from_any_click() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        // First click on empty ground, second on a heavy within the window
        state.click(&index, Vec2::new(50.0, 50.0), false, 5.0, &config);
        let outcome = state.click(&index, Vec2::new(8.0, 0.0), false, 5.25, &config);
        assert_eq!(outcome, ClickOutcome::SelectedClass { anchor: entity(3), count: 1 });
    }

    #[test]
    fn slow_second_click_is_single() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.click(&index, Vec2::new(0.0, 0.0), false, 1.0, &config);
        let outcome = state.click(&index, Vec2::new(0.0, 0.0), false, 1.5, &config);
        assert_eq!(outcome, ClickOutcome::Selected(entity(1)));
        assert_eq!(state.selected_count(), 1);
    }

    #[test]
    fn double_click_on_empty_ground_is_single_click() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.click(&index, Vec2::new(0.0, 0.0), false, 1.0, &config);
        let outcome = state.click(&index, Vec2::new(30.0, 0.0), false, 1.1, &config);
        assert_eq!(outcome, ClickOutcome::Cleared);
    }

    #[test]
    fn drag_selects_exactly_the_rectangle() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.add(entity(5));
        state.begin_drag(Vec2::new(9.0, -1.0));
        state.update_drag(Vec2::new(2.0, 0.5));
        let count = state.finish_drag(&index, Vec2::new(-1.0, 1.0), &config);
        assert_eq!(count, Some(3));
        assert_eq!(state.selected_agents(), &[entity(1), entity(2), entity(3)]);
        assert!(state.drag.is_none());
    }

    #[test]
    fn tiny_drag_is_only_a_click() {
        let index = field();
        let config = CommandConfig::default();
        let mut state = SelectionState::default();
        state.click(&index, Vec2::new(0.2, 0.0), false, 0.0, &config);
        state.begin_drag(Vec2::new(0.2, 0.0));
        assert_eq!(state.finish_drag(&index, Vec2::new(0.25, 0.05), &config), None);
        assert_eq!(state.selected_agents(), &[entity(1)]);
    }

    #[test]
    fn retain_live_prunes_stale_handles() {
        let index = field();
        let mut state = SelectionState::default();
        state.add(entity(1));
        state.add(entity(42));
        assert_eq!(state.retain_live(&index), 1);
        assert_eq!(state.selected_agents(), &[entity(1)]);
    }
}
