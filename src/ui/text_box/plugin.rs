// src/ui/text_box/plugin.rs
//
// TextBoxPlugin wires the modal text box into the frame ordering.

use bevy::prelude::*;

use crate::{
    core::{config::ShopConfig, plugin::ShopSet},
    dialogue::systems::show_queued_messages,
};

use super::components::TextBox;
use super::systems::{handle_text_box_input, spawn_text_box, sync_text_box, tick_text_box};

pub struct TextBoxPlugin;

impl Plugin for TextBoxPlugin {
    fn build(&self, app: &mut App) {
        let text_box = app
            .world()
            .get_resource::<ShopConfig>()
            .map(|config| TextBox::new(config.text.seconds_per_char, config.text.use_typewriter))
            .unwrap_or_default();

        app.insert_resource(text_box)
            .add_systems(Startup, spawn_text_box)
            .add_systems(Update, handle_text_box_input.in_set(ShopSet::Input))
            .add_systems(
                Update,
                tick_text_box
                    .in_set(ShopSet::Dialogue)
                    .after(show_queued_messages),
            )
            .add_systems(Update, sync_text_box.in_set(ShopSet::Presentation));
    }
}
