//! Draws the current speaker's face into the text box portrait slot.
use bevy::prelude::*;

use crate::dialogue::session::DialogueSession;

use super::components::{FaceGrid, PortraitCell, PortraitGlyphs, PortraitSlot};

/// Glyphs for every feature in a section, in placement order.
pub fn section_glyphs(grid: &FaceGrid, index: usize) -> String {
    grid.section(index)
        .map(|section| {
            section
                .features
                .iter()
                .map(|placed| placed.feature.glyph())
                .collect()
        })
        .unwrap_or_default()
}

/// Shows the active customer's face, or hides the slot when there is none.
pub fn sync_portrait(
    session: Res<DialogueSession>,
    faces: Query<&FaceGrid>,
    mut slots: Query<&mut Node, With<PortraitSlot>>,
    mut cells: Query<(&PortraitCell, &mut BackgroundColor)>,
    mut glyphs: Query<(&PortraitGlyphs, &mut Text)>,
) {
    if !session.is_changed() {
        return;
    }

    let face = session.active_npc().and_then(|npc| faces.get(npc).ok());
    for mut node in slots.iter_mut() {
        node.display = if face.is_some() {
            Display::Flex
        } else {
            Display::None
        };
    }

    let Some(face) = face else {
        return;
    };
    for (cell, mut background) in cells.iter_mut() {
        if let Some(section) = face.section(cell.0) {
            background.0 = section.color;
        }
    }
    for (cell, mut text) in glyphs.iter_mut() {
        text.0 = section_glyphs(face, cell.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portrait::components::FaceFeature;

    #[test]
    fn glyphs_follow_placement_order() {
        let mut grid = FaceGrid::default();
        grid.place_feature(1, FaceFeature::Eye, Vec2::ZERO);
        grid.place_feature(1, FaceFeature::Mole, Vec2::ZERO);

        assert_eq!(section_glyphs(&grid, 1), "o.");
        assert_eq!(section_glyphs(&grid, 2), "");
        assert_eq!(section_glyphs(&grid, 12), "");
    }

    #[test]
    fn portrait_slot_tracks_the_active_customer() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<DialogueSession>()
            .add_systems(Update, sync_portrait);

        let slot = app
            .world_mut()
            .spawn((
                Node {
                    display: Display::None,
                    ..default()
                },
                PortraitSlot,
            ))
            .id();
        let cell = app
            .world_mut()
            .spawn((PortraitCell(4), BackgroundColor(Color::WHITE)))
            .id();

        let mut face = FaceGrid::default();
        face.set_section_color(4, Color::BLACK);
        let npc = app.world_mut().spawn(face).id();
        app.world_mut()
            .resource_mut::<DialogueSession>()
            .begin(npc, None)
            .unwrap();
        app.update();

        assert_eq!(app.world().get::<Node>(slot).unwrap().display, Display::Flex);
        assert_eq!(app.world().get::<BackgroundColor>(cell).unwrap().0, Color::BLACK);

        app.world_mut()
            .resource_mut::<DialogueSession>()
            .finish(crate::dialogue::session::DialogueOutcome::Refused);
        app.update();
        assert_eq!(app.world().get::<Node>(slot).unwrap().display, Display::None);
    }
}
