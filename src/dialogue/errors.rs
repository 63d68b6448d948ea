//! Errors surfaced when the dialogue flow rejects a request.
use std::fmt;

use bevy::prelude::Entity;

use super::session::DialogueChoice;
use crate::npc::state::NpcState;

#[derive(Debug, Clone, PartialEq)]
pub enum DialogueError {
    SessionAlreadyActive { active: Entity },
    NpcMissing { npc: Entity },
    NpcNotWaiting { npc: Entity, state: NpcState },
    NoActiveSession,
    ChoicesHidden { choice: DialogueChoice },
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionAlreadyActive { active } => {
                write!(f, "a dialogue session with {:?} is already running", active)
            }
            Self::NpcMissing { npc } => write!(f, "{:?} is not a customer", npc),
            Self::NpcNotWaiting { npc, state } => {
                write!(f, "{:?} is {} rather than waiting at the counter", npc, state)
            }
            Self::NoActiveSession => write!(f, "no dialogue session is running"),
            Self::ChoicesHidden { choice } => {
                write!(f, "choice {} arrived while choices were hidden", choice)
            }
        }
    }
}

impl std::error::Error for DialogueError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let npc = Entity::PLACEHOLDER;
        let not_waiting = DialogueError::NpcNotWaiting {
            npc,
            state: NpcState::Walking,
        };
        assert!(not_waiting.to_string().contains("walking"));

        let hidden = DialogueError::ChoicesHidden {
            choice: DialogueChoice::Barter,
        };
        assert!(hidden.to_string().contains("Barter"));
        assert_eq!(
            DialogueError::NoActiveSession.to_string(),
            "no dialogue session is running"
        );
    }
}
