//! WorldPlugin sets up the shop floor and its fixed layout.
use bevy::prelude::*;

use crate::world::{components::ShopLayout, systems::spawn_shop_environment};

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        let layout = ShopLayout::default();
        info!(
            "Shop layout: door {:?}, counter {:?}",
            layout.door, layout.customer_spot
        );

        app.insert_resource(layout)
            .add_systems(Startup, spawn_shop_environment);
    }
}
