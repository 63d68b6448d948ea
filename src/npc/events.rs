//! Customer lifecycle messages broadcast between systems.
use bevy::prelude::*;

use super::components::NpcId;

/// Fired when a customer reaches the counter and its patience timer is armed.
#[derive(Message, Debug, Clone, Copy)]
pub struct NpcArrivedAtCounterEvent {
    pub entity: Entity,
    pub npc: NpcId,
}

/// Fired on the tick a customer's patience runs out.
#[derive(Message, Debug, Clone, Copy)]
pub struct PatienceExpiredEvent {
    pub entity: Entity,
    pub npc: NpcId,
}

/// Fired when a leaving customer reaches the exit and is removed.
#[derive(Message, Debug, Clone)]
pub struct NpcDepartedEvent {
    pub npc: NpcId,
    pub display_name: String,
}
