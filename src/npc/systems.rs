//! Systems advancing customers through their visit.
use bevy::prelude::*;

use crate::{
    core::{config::ShopConfig, plugin::SimulationClock},
    dialogue::{commands::DisplayMessage, events::DialogueEndedEvent},
    player::components::Player,
};

use super::{
    components::{Identity, ShopNpc},
    events::{NpcArrivedAtCounterEvent, NpcDepartedEvent, PatienceExpiredEvent},
    navigation::NavAgent,
    patience::{indicator_color, PatienceIndicator, PatienceTimer},
    state::{NpcBrain, NpcState, NpcTransition},
};

const INDICATOR_HEIGHT: f32 = 2.2;

/// Hands customers back to their state machine once a conversation ends.
pub fn finish_conversations(
    mut ended: MessageReader<DialogueEndedEvent>,
    mut customers: Query<(&mut NpcBrain, &mut PatienceTimer)>,
) {
    for event in ended.read() {
        let Ok((mut brain, mut timer)) = customers.get_mut(event.npc) else {
            continue;
        };
        brain.finish_talking(&mut timer);
        debug!("{:?} finished talking ({})", event.npc, event.outcome);
    }
}

/// Evaluates each customer's state machine once per tick.
#[allow(clippy::type_complexity)]
pub fn run_npc_state_machines(
    mut commands: Commands,
    mut customers: Query<(
        Entity,
        &Identity,
        &ShopNpc,
        &Transform,
        &mut NpcBrain,
        &mut PatienceTimer,
        &mut NavAgent,
    )>,
    mut arrived: MessageWriter<NpcArrivedAtCounterEvent>,
    mut departed: MessageWriter<NpcDepartedEvent>,
) {
    for (entity, identity, customer, transform, mut brain, mut timer, mut agent) in
        customers.iter_mut()
    {
        let transition = brain.step(
            transform.translation,
            &mut timer,
            customer.wait_time_at_counter(),
        );

        match transition {
            NpcTransition::None => {}
            NpcTransition::StartedWalking => {
                debug!("{} starts walking", identity.display_name);
            }
            NpcTransition::ArrivedAtCounter => {
                agent.stop();
                info!(
                    "{} waits at the counter ({:.1}s of patience)",
                    identity.display_name,
                    customer.wait_time_at_counter()
                );
                arrived.write(NpcArrivedAtCounterEvent {
                    entity,
                    npc: identity.id,
                });
            }
            NpcTransition::LostPatience => {
                info!("{} lost patience and heads for the door", identity.display_name);
                commands.queue(DisplayMessage::new(format!(
                    "{} got tired of waiting.",
                    identity.display_name
                )));
            }
            NpcTransition::Departed => {
                info!("{} left the shop", identity.display_name);
                departed.write(NpcDepartedEvent {
                    npc: identity.id,
                    display_name: identity.display_name.clone(),
                });
                commands.entity(entity).despawn();
                continue;
            }
        }

        if brain.state() == NpcState::Walking {
            agent.set_destination(brain.target_position());
        }
    }
}

/// Advances patience countdowns and flags expiry for the next state machine tick.
pub fn tick_patience_timers(
    clock: Res<SimulationClock>,
    mut customers: Query<(Entity, &Identity, &mut NpcBrain, &mut PatienceTimer)>,
    mut expired: MessageWriter<PatienceExpiredEvent>,
) {
    let delta = clock.last_scaled_delta();
    for (entity, identity, mut brain, mut timer) in customers.iter_mut() {
        if timer.tick(delta) {
            info!("Patience timer expired for {}", identity.display_name);
            brain.notify_patience_expired();
            expired.write(PatienceExpiredEvent {
                entity,
                npc: identity.id,
            });
        }
    }
}

/// Keeps each indicator above its customer, facing the player, sized and
/// coloured by the remaining patience.
pub fn update_patience_indicators(
    mut commands: Commands,
    config: Res<ShopConfig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    viewer: Query<&GlobalTransform, With<Player>>,
    owners: Query<(&Transform, &PatienceTimer), Without<PatienceIndicator>>,
    mut indicators: Query<(Entity, &PatienceIndicator, &mut Transform, &mut Visibility)>,
) {
    let viewer_position = viewer.iter().next().map(GlobalTransform::translation);

    for (entity, indicator, mut transform, mut visibility) in indicators.iter_mut() {
        let Ok((owner_transform, timer)) = owners.get(indicator.owner) else {
            commands.entity(entity).despawn();
            continue;
        };

        if !timer.is_active() {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Inherited;

        transform.translation = owner_transform.translation + Vec3::Y * INDICATOR_HEIGHT;
        transform.scale.x = (timer.fill_fraction() * indicator.full_width).max(0.001);

        if let Some(viewer_position) = viewer_position {
            let level_target = Vec3::new(
                viewer_position.x,
                transform.translation.y,
                viewer_position.z,
            );
            if level_target.distance_squared(transform.translation) > f32::EPSILON {
                transform.look_at(level_target, Vec3::Y);
            }
        }

        if let Some(material) = materials.get_mut(&indicator.material) {
            material.base_color = indicator_color(
                config.patience.start_color,
                config.patience.end_color,
                timer.progress(),
            );
        }
    }
}
