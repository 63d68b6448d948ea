// src/ui/mod.rs
//
// Screen-space UI for the shop counter.
//
// Current features:
// - Text box with typewriter reveal and portrait (bottom centre)
// - Barter / Accept / Refuse choice row above it

pub mod choice_panel;
pub mod text_box;

use bevy::prelude::*;

use choice_panel::ChoicePanelPlugin;
use text_box::TextBoxPlugin;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        info!("UiPlugin registered");
        app.add_plugins((TextBoxPlugin, ChoicePanelPlugin));
    }
}
