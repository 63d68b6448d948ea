// src/ui/choice_panel/systems.rs
//
// Spawning, input and visibility for the choice row.

use bevy::prelude::*;

use crate::dialogue::{
    events::DialogueChoiceEvent,
    session::{DialogueChoice, DialogueSession},
};

use super::components::{ChoiceButton, ChoicePanelRoot};

const BUTTON_COLOR: Color = Color::srgba(0.18, 0.16, 0.14, 0.95);
const BUTTON_HOVER_COLOR: Color = Color::srgba(0.3, 0.26, 0.2, 0.95);
const BUTTON_BORDER_COLOR: Color = Color::srgb(0.55, 0.45, 0.3);

/// Spawns the hidden row of three buttons above the text box.
pub fn spawn_choice_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(184.0),
                left: Val::Percent(15.0),
                width: Val::Percent(70.0),
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(12.0),
                display: Display::None,
                ..default()
            },
            ChoicePanelRoot,
            Name::new("Choice Panel"),
        ))
        .with_children(|parent| {
            for (index, choice) in DialogueChoice::ALL.into_iter().enumerate() {
                parent
                    .spawn((
                        Node {
                            width: Val::Px(160.0),
                            padding: UiRect::all(Val::Px(8.0)),
                            border: UiRect::all(Val::Px(1.5)),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        Button,
                        Interaction::None,
                        BackgroundColor(BUTTON_COLOR),
                        BorderColor::from(BUTTON_BORDER_COLOR),
                        ChoiceButton(choice),
                        Name::new(format!("Choice Button {}", choice.label())),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(format!("{}. {}", index + 1, choice.label())),
                            TextFont {
                                font_size: 16.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });
}

/// Submits the choice of a clicked button.
#[allow(clippy::type_complexity)]
pub fn handle_choice_buttons(
    session: Res<DialogueSession>,
    mut buttons: Query<
        (&Interaction, &ChoiceButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut choices: MessageWriter<DialogueChoiceEvent>,
) {
    for (interaction, button, mut background) in buttons.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                background.0 = BUTTON_COLOR;
                if session.choices_visible() {
                    choices.write(DialogueChoiceEvent { choice: button.0 });
                }
            }
            Interaction::Hovered => background.0 = BUTTON_HOVER_COLOR,
            Interaction::None => background.0 = BUTTON_COLOR,
        }
    }
}

/// Number keys 1-3 pick Barter / Accept / Refuse.
pub fn handle_choice_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<DialogueSession>,
    mut choices: MessageWriter<DialogueChoiceEvent>,
) {
    if !session.choices_visible() {
        return;
    }
    for choice in DialogueChoice::ALL {
        if keyboard.just_pressed(ChoiceButton(choice).hotkey()) {
            choices.write(DialogueChoiceEvent { choice });
            return;
        }
    }
}

/// Shows the row only while the session is waiting for a choice.
pub fn sync_choice_panel(
    session: Res<DialogueSession>,
    mut panels: Query<&mut Node, With<ChoicePanelRoot>>,
) {
    if !session.is_changed() {
        return;
    }
    let display = if session.choices_visible() {
        Display::Flex
    } else {
        Display::None
    };
    for mut node in panels.iter_mut() {
        node.display = display;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Resource, Default)]
    struct Chosen(Vec<DialogueChoice>);

    fn collect(mut reader: MessageReader<DialogueChoiceEvent>, mut chosen: ResMut<Chosen>) {
        chosen.0.extend(reader.read().map(|event| event.choice));
    }

    fn hotkey_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<DialogueSession>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Chosen>()
            .add_message::<DialogueChoiceEvent>()
            .add_systems(Update, (handle_choice_hotkeys, collect).chain());
        app
    }

    #[test]
    fn hotkeys_are_ignored_without_visible_choices() {
        let mut app = hotkey_app();
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit1);
        app.update();
        assert!(app.world().resource::<Chosen>().0.is_empty());
    }

    #[test]
    fn hotkey_submits_matching_choice() {
        let mut app = hotkey_app();
        {
            let npc = app.world_mut().spawn_empty().id();
            let mut session = app.world_mut().resource_mut::<DialogueSession>();
            session.begin(npc, None).unwrap();
            session.present_choices();
        }
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::Digit3);
        app.update();
        assert_eq!(app.world().resource::<Chosen>().0, vec![DialogueChoice::Refuse]);
    }
}
