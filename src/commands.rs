// Order dispatch - turns move / stop / patrol intents into motion transitions for the selection
use bevy::prelude::*;

use crate::config::CommandConfig;
use crate::destination::{resolve_group, resolve_single};
use crate::error::OrderRejection;
use crate::movement::Motion;
use crate::selection::SelectionState;
use crate::spatial::{AgentIndex, IndexedAgent};

/// Order intent for the current selection
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum UnitOrder {
    Move(Vec2),
    Stop,
    Patrol(Vec2),
}

/// Work out the new motion of every affected agent without touching the world.
/// Selected handles that are no longer live are skipped.
pub fn plan_order(
    order: UnitOrder,
    selected: &[Entity],
    index: &AgentIndex,
    config: &CommandConfig,
) -> Result<Vec<(Entity, Motion)>, OrderRejection> {
    if selected.is_empty() {
        return Err(OrderRejection::EmptySelection);
    }

    let live: Vec<&IndexedAgent> = selected.iter().filter_map(|&e| index.get(e)).collect();
    let Some(first) = live.first().copied() else {
        return Err(OrderRejection::StaleReference(selected[0]));
    };

    match order {
        UnitOrder::Move(point) if live.len() == 1 => {
            let destination = resolve_single(index, first, point, config);
            Ok(vec![(first.entity, Motion::move_to(destination))])
        }
        UnitOrder::Move(point) => {
            let entities: Vec<Entity> = live.iter().map(|a| a.entity).collect();
            let assignments = resolve_group(index, point, &entities, config.formation_spacing)?;
            Ok(assignments
                .into_iter()
                .map(|a| (a.entity, Motion::move_to(a.destination)))
                .collect())
        }
        UnitOrder::Stop => Ok(live.iter().map(|a| (a.entity, Motion::Idle)).collect()),
        UnitOrder::Patrol(point) => {
            if live.len() != 1 {
                return Err(OrderRejection::PatrolNeedsSingleAgent(live.len()));
            }
            Ok(vec![(first.entity, Motion::patrol(first.position, point, config.patrol_wait))])
        }
    }
}

/// System: apply this frame's orders to the selected agents
pub fn dispatch_orders(
    mut orders: EventReader<UnitOrder>,
    selection: Res<SelectionState>,
    index: Res<AgentIndex>,
    config: Res<CommandConfig>,
    mut motions: Query<&mut Motion>,
) {
    for &order in orders.read() {
        let plan = match plan_order(order, selection.selected_agents(), &index, &config) {
            Ok(plan) => plan,
            Err(rejection) => {
                debug!("Ignored {:?}: {}", order, rejection);
                continue;
            }
        };

        match order {
            UnitOrder::Move(p) => info!("Move order to ({:.1}, {:.1}) for {} units", p.x, p.y, plan.len()),
            UnitOrder::Stop => info!("Stop order for {} units", plan.len()),
            UnitOrder::Patrol(p) => info!("Patrol order to ({:.1}, {:.1})", p.x, p.y),
        }

        // Replacing the component discards any in-flight route or wait timer
        for (entity, next) in plan {
            if let Ok(mut motion) = motions.get_mut(entity) {
                *motion = next;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::tests::{entity, indexed};
    use crate::types::UnitClass;

    fn index_with(agents: &[(u32, f32, f32)]) -> AgentIndex {
        let mut index = AgentIndex::new();
        index.rebuild(agents.iter().map(|&(n, x, y)| indexed(n, x, y, 0.5, UnitClass::Infantry)));
        index
    }

    #[test]
    fn orders_without_selection_are_rejected() {
        let index = index_with(&[(1, 0.0, 0.0)]);
        let config = CommandConfig::default();
        for order in [UnitOrder::Move(Vec2::ONE), UnitOrder::Stop, UnitOrder::Patrol(Vec2::ONE)] {
            assert_eq!(plan_order(order, &[], &index, &config).err(), Some(OrderRejection::EmptySelection));
        }
    }

    #[test]
    fn all_stale_selection_is_rejected() {
        let index = index_with(&[(1, 0.0, 0.0)]);
        let result = plan_order(UnitOrder::Stop, &[entity(9)], &index, &CommandConfig::default());
        assert_eq!(result.err(), Some(OrderRejection::StaleReference(entity(9))));
    }

    #[test]
    fn single_move_avoids_occupied_target() {
        let index = index_with(&[(1, 0.0, 0.0), (2, 5.0, 0.0)]);
        let plan = plan_order(UnitOrder::Move(Vec2::new(5.0, 0.0)), &[entity(1)], &index, &CommandConfig::default()).unwrap();
        assert_eq!(plan.len(), 1);
        let (who, motion) = &plan[0];
        assert_eq!(*who, entity(1));
        let dest = motion.destination().unwrap();
        assert!(dest.distance(Vec2::new(6.0, 0.0)) < 1e-5, "got {dest}");
    }

    #[test]
    fn single_live_agent_among_stale_moves_directly() {
        let index = index_with(&[(1, 0.0, 0.0)]);
        let plan = plan_order(UnitOrder::Move(Vec2::new(3.0, 3.0)), &[entity(8), entity(1)], &index, &CommandConfig::default()).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].1.destination(), Some(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn group_move_uses_formation() {
        let index = index_with(&[(1, 0.0, 0.0), (2, 1.0, 0.0), (3, 2.0, 0.0), (4, 3.0, 0.0)]);
        let config = CommandConfig::default();
        let selected = [entity(1), entity(2), entity(3), entity(4)];
        let plan = plan_order(UnitOrder::Move(Vec2::new(10.0, 10.0)), &selected, &index, &config).unwrap();
        assert_eq!(plan.len(), 4);
        let radius = config.formation_spacing * 2.0;
        for (_, motion) in &plan {
            assert!(matches!(motion, Motion::Moving { .. }));
            let dest = motion.destination().unwrap();
            assert!((dest.distance(Vec2::new(10.0, 10.0)) - radius).abs() < 1e-4);
        }
    }

    #[test]
    fn stop_idles_every_selected_agent() {
        let index = index_with(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        let plan = plan_order(UnitOrder::Stop, &[entity(1), entity(2)], &index, &CommandConfig::default()).unwrap();
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|(_, m)| m.is_idle()));
    }

    #[test]
    fn patrol_needs_exactly_one_agent() {
        let index = index_with(&[(1, 0.0, 0.0), (2, 1.0, 0.0)]);
        let config = CommandConfig::default();
        let result = plan_order(UnitOrder::Patrol(Vec2::ONE), &[entity(1), entity(2)], &index, &config);
        assert_eq!(result.err(), Some(OrderRejection::PatrolNeedsSingleAgent(2)));

        let plan = plan_order(UnitOrder::Patrol(Vec2::new(4.0, 0.0)), &[entity(2)], &index, &config).unwrap();
        match &plan[0].1 {
            Motion::Patrolling(route) => {
                assert_eq!(route.origin, Vec2::new(1.0, 0.0));
                assert_eq!(route.target, Vec2::new(4.0, 0.0));
                assert!(route.toward_target);
                assert_eq!(route.wait_time, config.patrol_wait);
            }
            other => panic!("expected patrol, got {other:?}"),
        }
    }
}
