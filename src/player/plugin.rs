//! Player plugin wiring camera, movement and interaction systems.
use bevy::prelude::*;

use crate::{
    core::plugin::ShopSet,
    player::{
        components::{PlayerFocus, PointerCapture},
        systems::{
            apply_pointer_capture, detect_focused_customer, handle_interact_input,
            mark_player_talking, player_mouse_look, player_translate, spawn_interact_prompt,
            spawn_player, sync_interact_prompt,
        },
    },
};

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerCapture>()
            .init_resource::<PlayerFocus>()
            .add_systems(Startup, (spawn_player, spawn_interact_prompt))
            .add_systems(
                Update,
                (
                    mark_player_talking,
                    player_mouse_look,
                    player_translate,
                    detect_focused_customer,
                    handle_interact_input,
                )
                    .chain()
                    .in_set(ShopSet::Input),
            )
            .add_systems(
                Update,
                (apply_pointer_capture, sync_interact_prompt).in_set(ShopSet::Presentation),
            );

        info!("PlayerPlugin registered");
    }
}
