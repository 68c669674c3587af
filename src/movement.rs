// Per-agent motion state machine (Idle / Moving / Patrolling) and its tick system
use bevy::prelude::*;
use std::time::Duration;

use crate::config::CommandConfig;
use crate::math_utils::move_towards;
use crate::types::Agent;

/// Oscillating route between where the patrol started and the ordered point
#[derive(Clone, Debug)]
pub struct PatrolRoute {
    pub origin: Vec2,
    pub target: Vec2,
    pub toward_target: bool,
    /// Running while the agent pauses at an endpoint
    pub wait: Option<Timer>,
    pub wait_time: f32,
}

impl PatrolRoute {
    pub fn new(origin: Vec2, target: Vec2, wait_time: f32) -> Self {
        Self { origin, target, toward_target: true, wait: None, wait_time }
    }

    /// Endpoint of the current leg
    pub fn current_goal(&self) -> Vec2 {
        if self.toward_target { self.target } else { self.origin }
    }

    pub fn is_waiting(&self) -> bool {
        self.wait.is_some()
    }
}

#[derive(Component, Clone, Debug, Default)]
pub enum Motion {
    #[default]
    Idle,
    Moving { target: Vec2 },
    Patrolling(PatrolRoute),
}

/// Notable transitions produced by [`Motion::advance`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionEvent {
    Arrived(Vec2),
    ReachedWaypoint(Vec2),
    LegStarted { toward: Vec2 },
}

impl Motion {
    pub fn move_to(target: Vec2) -> Self {
        Motion::Moving { target }
    }

    pub fn patrol(origin: Vec2, target: Vec2, wait_time: f32) -> Self {
        Motion::Patrolling(PatrolRoute::new(origin, target, wait_time))
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Motion::Idle)
    }

    /// Where the agent is currently heading, if anywhere
    pub fn destination(&self) -> Option<Vec2> {
        match self {
            Motion::Idle => None,
            Motion::Moving { target } => Some(*target),
            Motion::Patrolling(route) => Some(route.current_goal()),
        }
    }

    /// Advance one tick. Only this function writes an agent's position.
    /// A patrol wait that ends mid-tick hands the rest of the tick to the next leg.
    pub fn advance(&mut self, position: &mut Vec2, speed: f32, delta: Duration, tolerance: f32) -> Option<MotionEvent> {
        let step = speed * delta.as_secs_f32();
        match self {
            Motion::Idle => None,
            Motion::Moving { target } => {
                let target = *target;
                if position.distance(target) <= tolerance {
                    // Snap so no residual drift is left behind
                    *position = target;
                    *self = Motion::Idle;
                    return Some(MotionEvent::Arrived(target));
                }
                *position = move_towards(*position, target, step);
                None
            }
            Motion::Patrolling(route) => {
                if let Some(wait) = route.wait.as_mut() {
                    // Time left over after the wait ends is spent on the new leg
                    let leftover = delta.saturating_sub(wait.remaining());
                    wait.tick(delta);
                    if !wait.finished() {
                        return None;
                    }
                    route.wait = None;
                    route.toward_target = !route.toward_target;
                    let goal = route.current_goal();
                    *position = move_towards(*position, goal, speed * leftover.as_secs_f32());
                    return Some(MotionEvent::LegStarted { toward: goal });
                }

                let goal = route.current_goal();
                if position.distance(goal) <= tolerance {
                    route.wait = Some(Timer::from_seconds(route.wait_time, TimerMode::Once));
                    return Some(MotionEvent::ReachedWaypoint(goal));
                }
                *position = move_towards(*position, goal, step);
                None
            }
        }
    }
}

/// System: advance every agent's motion by the frame delta
pub fn advance_motion(
    time: Res<Time>,
    config: Res<CommandConfig>,
    mut agents: Query<(Entity, &Agent, &mut Motion, &mut Transform)>,
) {
    let delta = time.delta();
    if delta.is_zero() {
        return;
    }

    for (entity, agent, mut motion, mut transform) in agents.iter_mut() {
        if motion.is_idle() {
            continue;
        }

        let mut position = transform.translation.truncate();
        let event = motion.advance(&mut position, agent.speed, delta, config.arrival_tolerance);
        transform.translation.x = position.x;
        transform.translation.y = position.y;

        match event {
            Some(MotionEvent::Arrived(at)) => debug!("{:?} arrived at ({:.1}, {:.1})", entity, at.x, at.y),
            Some(MotionEvent::ReachedWaypoint(at)) => debug!("{:?} holding at patrol point ({:.1}, {:.1})", entity, at.x, at.y),
            Some(MotionEvent::LegStarted { toward }) => debug!("{:?} patrolling toward ({:.1}, {:.1})", entity, toward.x, toward.y),
            None => {}
        }
    }
}
