// src/ui/choice_panel/components.rs
//
// Markers for the Barter / Accept / Refuse panel.

use bevy::prelude::*;

use crate::dialogue::session::DialogueChoice;

/// Root node of the choice row.
#[derive(Component, Debug)]
pub struct ChoicePanelRoot;

/// Button that submits its choice when pressed.
#[derive(Component, Debug, Clone, Copy)]
pub struct ChoiceButton(pub DialogueChoice);

impl ChoiceButton {
    /// Number key bound to the choice, matching its position in the row.
    pub fn hotkey(self) -> KeyCode {
        match self.0 {
            DialogueChoice::Barter => KeyCode::Digit1,
            DialogueChoice::Accept => KeyCode::Digit2,
            DialogueChoice::Refuse => KeyCode::Digit3,
        }
    }
}
