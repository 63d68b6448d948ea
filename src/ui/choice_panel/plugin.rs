// src/ui/choice_panel/plugin.rs
//
// ChoicePanelPlugin registers the Barter / Accept / Refuse row.

use bevy::prelude::*;

use crate::core::plugin::ShopSet;

use super::systems::{
    handle_choice_buttons, handle_choice_hotkeys, spawn_choice_panel, sync_choice_panel,
};

pub struct ChoicePanelPlugin;

impl Plugin for ChoicePanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_choice_panel)
            .add_systems(
                Update,
                (handle_choice_buttons, handle_choice_hotkeys).in_set(ShopSet::Input),
            )
            .add_systems(Update, sync_choice_panel.in_set(ShopSet::Presentation));
    }
}
