//! PortraitPlugin registers the face library and the portrait renderer.
use bevy::prelude::*;

use crate::core::plugin::ShopSet;

use super::{assembly::FaceLibrary, systems::sync_portrait};

pub struct PortraitPlugin;

impl Plugin for PortraitPlugin {
    fn build(&self, app: &mut App) {
        let library = FaceLibrary::default();
        info!("PortraitPlugin registered with {} face sets", library.len());

        app.insert_resource(library)
            .add_systems(Update, sync_portrait.in_set(ShopSet::Presentation));
    }
}
