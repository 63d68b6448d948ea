// src/ui/text_box/systems.rs
//
// Spawning, input, reveal timing and presentation for the text box.

use bevy::prelude::*;

use crate::{
    core::plugin::SimulationClock,
    dialogue::events::TextContinuedEvent,
    portrait::components::{PortraitCell, PortraitGlyphs, PortraitSlot, GRID_COLS, SECTION_COUNT},
};

use super::components::{
    ContinuePrompt, TextBox, TextBoxBody, TextBoxRoot, TextBoxSpeaker, TextTrigger,
};

// Visual constants
const BACKGROUND_COLOR: Color = Color::srgba(0.08, 0.07, 0.06, 0.94);
const BORDER_COLOR: Color = Color::srgb(0.45, 0.36, 0.24);
const TEXT_COLOR: Color = Color::WHITE;
const NAME_COLOR: Color = Color::srgb(1.0, 0.9, 0.4);
const PROMPT_COLOR: Color = Color::srgb(0.7, 0.7, 0.7);
const PORTRAIT_CELL_SIZE: f32 = 32.0;

/// Keys that skip the reveal or continue past a finished line.
pub const CONTINUE_KEYS: [KeyCode; 3] = [KeyCode::Space, KeyCode::Enter, KeyCode::KeyE];

/// Spawns the hidden panel: portrait on the left, speaker and body on the right.
pub fn spawn_text_box(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(24.0),
                left: Val::Percent(15.0),
                width: Val::Percent(70.0),
                min_height: Val::Px(140.0),
                padding: UiRect::all(Val::Px(16.0)),
                border: UiRect::all(Val::Px(2.0)),
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(16.0),
                display: Display::None,
                ..default()
            },
            BackgroundColor(BACKGROUND_COLOR),
            BorderColor::from(BORDER_COLOR),
            TextBoxRoot,
            Name::new("Text Box"),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(PORTRAIT_CELL_SIZE * GRID_COLS as f32),
                        height: Val::Px(PORTRAIT_CELL_SIZE * GRID_COLS as f32),
                        flex_direction: FlexDirection::Row,
                        flex_wrap: FlexWrap::Wrap,
                        flex_shrink: 0.0,
                        display: Display::None,
                        ..default()
                    },
                    PortraitSlot,
                    Name::new("Portrait"),
                ))
                .with_children(|portrait| {
                    for index in 0..SECTION_COUNT {
                        portrait
                            .spawn((
                                Node {
                                    width: Val::Px(PORTRAIT_CELL_SIZE),
                                    height: Val::Px(PORTRAIT_CELL_SIZE),
                                    justify_content: JustifyContent::Center,
                                    align_items: AlignItems::Center,
                                    ..default()
                                },
                                BackgroundColor(Color::WHITE),
                                PortraitCell(index),
                            ))
                            .with_children(|cell| {
                                cell.spawn((
                                    Text::new(""),
                                    TextFont {
                                        font_size: 14.0,
                                        ..default()
                                    },
                                    TextColor(Color::BLACK),
                                    PortraitGlyphs(index),
                                ));
                            });
                    }
                });

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    flex_grow: 1.0,
                    row_gap: Val::Px(8.0),
                    ..default()
                })
                .with_children(|column| {
                    column.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(NAME_COLOR),
                        TextBoxSpeaker,
                    ));
                    column.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(TEXT_COLOR),
                        TextBoxBody,
                    ));
                    column.spawn((
                        Text::new("[Space] continue"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(PROMPT_COLOR),
                        Visibility::Hidden,
                        ContinuePrompt,
                    ));
                });
        });
}

/// Skip or continue on Space / Enter / E.
pub fn handle_text_box_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut text_box: ResMut<TextBox>,
    mut continued: MessageWriter<TextContinuedEvent>,
) {
    if !keyboard.any_just_pressed(CONTINUE_KEYS) {
        return;
    }

    match text_box.trigger() {
        TextTrigger::Ignored => {}
        TextTrigger::Skipped => debug!("Text reveal skipped"),
        TextTrigger::Continued(Some(continuation)) => {
            continued.write(TextContinuedEvent { continuation });
        }
        TextTrigger::Continued(None) => {}
    }
}

/// Advances the typewriter by the scaled frame delta.
pub fn tick_text_box(clock: Res<SimulationClock>, mut text_box: ResMut<TextBox>) {
    text_box.tick(clock.delta_secs());
}

/// Mirrors the `TextBox` resource into the spawned UI nodes.
#[allow(clippy::type_complexity)]
pub fn sync_text_box(
    text_box: Res<TextBox>,
    mut roots: Query<&mut Node, With<TextBoxRoot>>,
    mut bodies: Query<&mut Text, (With<TextBoxBody>, Without<TextBoxSpeaker>)>,
    mut speakers: Query<&mut Text, (With<TextBoxSpeaker>, Without<TextBoxBody>)>,
    mut prompts: Query<&mut Visibility, With<ContinuePrompt>>,
) {
    if !text_box.is_changed() {
        return;
    }

    for mut node in roots.iter_mut() {
        node.display = if text_box.is_visible() {
            Display::Flex
        } else {
            Display::None
        };
    }
    for mut body in bodies.iter_mut() {
        body.0 = text_box.visible_text().to_string();
    }
    for mut speaker in speakers.iter_mut() {
        speaker.0 = text_box.speaker().unwrap_or_default().to_string();
    }
    for mut visibility in prompts.iter_mut() {
        *visibility = if text_box.can_continue() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
