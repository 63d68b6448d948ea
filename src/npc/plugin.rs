//! NPC plugin wiring the customer lifecycle into the frame ordering.
use bevy::prelude::*;

use crate::{
    core::{config::ShopConfig, plugin::ShopSet},
    npc::{
        components::NpcIdGenerator,
        events::{NpcArrivedAtCounterEvent, NpcDepartedEvent, PatienceExpiredEvent},
        navigation::follow_nav_agents,
        spawning::{spawn_customers, CustomerSpawner},
        systems::{
            finish_conversations, run_npc_state_machines, tick_patience_timers,
            update_patience_indicators,
        },
    },
};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<ShopConfig>()
            .map(|config| config.npc.clone())
            .unwrap_or_else(|| ShopConfig::default().npc);
        let spawner =
            CustomerSpawner::new(settings.spawn_interval_seconds, settings.max_customers);

        app.init_resource::<NpcIdGenerator>()
            .insert_resource(spawner)
            .add_message::<NpcArrivedAtCounterEvent>()
            .add_message::<PatienceExpiredEvent>()
            .add_message::<NpcDepartedEvent>()
            .add_systems(
                Update,
                (
                    finish_conversations,
                    spawn_customers,
                    run_npc_state_machines,
                    tick_patience_timers,
                    follow_nav_agents,
                )
                    .chain()
                    .in_set(ShopSet::Npc),
            )
            .add_systems(
                Update,
                update_patience_indicators.in_set(ShopSet::Presentation),
            );

        info!("NpcPlugin registered");
    }
}
