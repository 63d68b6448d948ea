//! Systems for the shopkeeper: camera, movement, focus and starting negotiations.
use bevy::{
    input::mouse::MouseMotion,
    prelude::*,
    window::{CursorGrabMode, CursorOptions},
};

use crate::{
    core::{config::ShopConfig, plugin::SimulationClock},
    dialogue::{commands::StartDialogue, events::DialogueStartedEvent, session::DialogueSession},
    npc::{
        components::Identity,
        state::{NpcBrain, NpcState},
    },
    player::components::{InteractPrompt, Player, PlayerController, PlayerFocus, PointerCapture},
    ui::text_box::components::TextBox,
    world::components::ShopLayout,
};

/// Distance to `target` if it lies within `range` and within `cone_degrees`
/// of the view direction.
pub fn focus_distance(
    eye: Vec3,
    forward: Vec3,
    target: Vec3,
    range: f32,
    cone_degrees: f32,
) -> Option<f32> {
    let offset = target - eye;
    let distance = offset.length();
    if distance > range {
        return None;
    }
    if distance <= f32::EPSILON {
        return Some(0.0);
    }
    let angle = forward.normalize_or_zero().angle_between(offset / distance);
    (angle.to_degrees() <= cone_degrees).then_some(distance)
}

/// Spawns the first-person camera behind the counter, facing the door.
pub fn spawn_player(mut commands: Commands, layout: Res<ShopLayout>) {
    let look_target = Vec3::new(layout.door.x, layout.player_start.y, layout.door.z);
    let transform = Transform::from_translation(layout.player_start).looking_at(look_target, Vec3::Y);
    let (yaw, pitch, _) = transform.rotation.to_euler(EulerRot::YXZ);

    commands.spawn((
        Camera3d::default(),
        transform,
        Player,
        PlayerController::new(yaw, pitch),
        Name::new("Shopkeeper"),
    ));
}

/// Locks and hides the cursor while the pointer is captured.
pub fn apply_pointer_capture(
    pointer: Res<PointerCapture>,
    mut cursors: Query<&mut CursorOptions>,
) {
    if !pointer.is_changed() {
        return;
    }
    for mut cursor in cursors.iter_mut() {
        if pointer.is_locked() {
            cursor.visible = false;
            cursor.grab_mode = CursorGrabMode::Locked;
        } else {
            cursor.visible = true;
            cursor.grab_mode = CursorGrabMode::None;
        }
    }
}

/// Mouse look, suspended while talking or while the pointer is free.
pub fn player_mouse_look(
    mut motion_events: MessageReader<MouseMotion>,
    pointer: Res<PointerCapture>,
    config: Res<ShopConfig>,
    mut query: Query<(&mut PlayerController, &mut Transform), With<Player>>,
) {
    let cumulative_delta: Vec2 = motion_events.read().map(|ev| ev.delta).sum();
    if cumulative_delta == Vec2::ZERO || !pointer.is_locked() {
        return;
    }

    for (mut controller, mut transform) in query.iter_mut() {
        if controller.talking {
            continue;
        }
        controller.apply_look(cumulative_delta, config.player.mouse_sensitivity);
        transform.rotation = controller.rotation().normalize();
    }
}

/// WASD movement on the floor plane with acceleration and friction.
pub fn player_translate(
    keyboard: Res<ButtonInput<KeyCode>>,
    clock: Res<SimulationClock>,
    config: Res<ShopConfig>,
    mut query: Query<(&mut PlayerController, &mut Transform), With<Player>>,
) {
    let delta = clock.delta_secs();
    for (mut controller, mut transform) in query.iter_mut() {
        if controller.talking {
            controller.velocity = Vec3::ZERO;
            continue;
        }

        let forward = {
            let f = transform.forward().as_vec3();
            Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
        };
        let right = {
            let r = transform.right().as_vec3();
            Vec3::new(r.x, 0.0, r.z).normalize_or_zero()
        };
        let mut wish = Vec3::ZERO;
        if keyboard.pressed(KeyCode::KeyW) {
            wish += forward;
        }
        if keyboard.pressed(KeyCode::KeyS) {
            wish -= forward;
        }
        if keyboard.pressed(KeyCode::KeyA) {
            wish -= right;
        }
        if keyboard.pressed(KeyCode::KeyD) {
            wish += right;
        }

        transform.translation += controller.steer(wish, &config.player, delta);
    }
}

/// Picks the nearest customer waiting at the counter that the player faces.
pub fn detect_focused_customer(
    config: Res<ShopConfig>,
    player: Query<&Transform, With<Player>>,
    customers: Query<(Entity, &Transform, &NpcBrain, &Identity), Without<Player>>,
    mut focus: ResMut<PlayerFocus>,
) {
    let Ok(player_transform) = player.single() else {
        if focus.npc.is_some() {
            *focus = PlayerFocus::default();
        }
        return;
    };
    let eye = player_transform.translation;
    let forward = player_transform.forward().as_vec3();

    let nearest = customers
        .iter()
        .filter(|(_, _, brain, _)| brain.state() == NpcState::WaitingAtCounter)
        .filter_map(|(entity, transform, _, identity)| {
            focus_distance(
                eye,
                forward,
                transform.translation,
                config.player.interact_range,
                config.player.focus_cone_degrees,
            )
            .map(|distance| (entity, identity, distance))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2));

    let next = match nearest {
        Some((entity, identity, distance)) => PlayerFocus {
            npc: Some(entity),
            name: Some(identity.display_name.clone()),
            distance,
        },
        None => PlayerFocus::default(),
    };
    if focus.npc != next.npc {
        *focus = next;
    }
}

/// E starts a negotiation with the focused customer.
pub fn handle_interact_input(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    focus: Res<PlayerFocus>,
    session: Res<DialogueSession>,
    text_box: Res<TextBox>,
    player: Query<&PlayerController, With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    if session.is_active() || text_box.is_visible() {
        return;
    }
    if player.iter().any(|controller| controller.talking) {
        return;
    }
    let Some(npc) = focus.npc else {
        debug!("Player pressed E but nobody is waiting in view");
        return;
    };

    info!(
        "Player talks to {} (distance: {:.1})",
        focus.name.as_deref().unwrap_or("customer"),
        focus.distance
    );
    commands.queue(StartDialogue::new(npc).on_complete(|world: &mut World, _outcome| {
        let mut controllers = world.query_filtered::<&mut PlayerController, With<Player>>();
        for mut controller in controllers.iter_mut(world) {
            controller.talking = false;
        }
    }));
}

/// Suspends look and movement once a negotiation is running.
pub fn mark_player_talking(
    mut started: MessageReader<DialogueStartedEvent>,
    mut player: Query<&mut PlayerController, With<Player>>,
) {
    if started.read().count() == 0 {
        return;
    }
    for mut controller in player.iter_mut() {
        controller.talking = true;
    }
}

/// Spawns the hidden interact hint in the middle of the screen.
pub fn spawn_interact_prompt(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(55.0),
            left: Val::Percent(42.0),
            display: Display::None,
            ..default()
        },
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        InteractPrompt,
        Name::new("Interact Prompt"),
    ));
}

/// Shows "[E] Talk to <name>" while a customer is focused and the box is closed.
pub fn sync_interact_prompt(
    focus: Res<PlayerFocus>,
    text_box: Res<TextBox>,
    mut prompts: Query<(&mut Node, &mut Text), With<InteractPrompt>>,
) {
    let visible = focus.npc.is_some() && !text_box.is_visible();
    for (mut node, mut text) in prompts.iter_mut() {
        let display = if visible { Display::Flex } else { Display::None };
        if node.display != display {
            node.display = display;
        }
        if visible {
            let label = format!("[E] Talk to {}", focus.name.as_deref().unwrap_or("customer"));
            if text.0 != label {
                text.0 = label;
            }
        }
    }
}
