use bevy::prelude::*;

mod core;
mod dialogue;
mod npc;
mod player;
mod portrait;
mod ui;
mod world;

use crate::{
    core::CorePlugin, dialogue::DialoguePlugin, npc::NpcPlugin, player::PlayerPlugin,
    portrait::PortraitPlugin, ui::UiPlugin, world::WorldPlugin,
};

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins,
            CorePlugin::default(),
            DialoguePlugin,
            WorldPlugin,
            NpcPlugin, // After CorePlugin to read the spawner settings
            PlayerPlugin,
            UiPlugin,
            PortraitPlugin,
        ))
        .run();
}
