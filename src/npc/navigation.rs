//! Straight-line navigation agent standing in for a navmesh path follower.
use bevy::prelude::*;

use crate::core::plugin::SimulationClock;

/// Moves its entity toward `destination` at `speed` units per second.
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    destination: Option<Vec3>,
    pub speed: f32,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self {
            destination: None,
            speed: speed.max(0.0),
        }
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
    }

    pub fn stop(&mut self) {
        self.destination = None;
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Position after travelling toward the destination for `delta_seconds`.
    /// Never overshoots.
    pub fn advance(&self, from: Vec3, delta_seconds: f32) -> Vec3 {
        let Some(destination) = self.destination else {
            return from;
        };
        let step = self.speed * delta_seconds.max(0.0);
        let offset = destination - from;
        let distance = offset.length();
        if distance <= step || distance <= f32::EPSILON {
            destination
        } else {
            from + offset / distance * step
        }
    }
}

/// Moves every agent along its straight line and turns it to face travel direction.
pub fn follow_nav_agents(
    clock: Res<SimulationClock>,
    mut agents: Query<(&NavAgent, &mut Transform)>,
) {
    let delta = clock.delta_secs();
    for (agent, mut transform) in agents.iter_mut() {
        let from = transform.translation;
        let next = agent.advance(from, delta);
        if next == from {
            continue;
        }

        let heading = Vec3::new(next.x - from.x, 0.0, next.z - from.z);
        if heading.length_squared() > f32::EPSILON {
            let look_target = transform.translation + heading;
            transform.look_at(look_target, Vec3::Y);
        }
        transform.translation = next;
    }
}
