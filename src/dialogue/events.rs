//! Messages exchanged between input, the dialogue flow and customers.
use bevy::prelude::*;

use super::session::{DialogueChoice, DialogueOutcome, TextContinuation};

/// Player picked one of the three negotiation choices.
#[derive(Message, Debug, Clone, Copy)]
pub struct DialogueChoiceEvent {
    pub choice: DialogueChoice,
}

/// Player continued past a fully revealed line.
#[derive(Message, Debug, Clone, Copy)]
pub struct TextContinuedEvent {
    pub continuation: TextContinuation,
}

/// Fired once a session has bound itself to a customer.
#[derive(Message, Debug, Clone, Copy)]
pub struct DialogueStartedEvent {
    pub npc: Entity,
}

/// Fired exactly once per session, after its completion callback was queued.
#[derive(Message, Debug, Clone, Copy)]
pub struct DialogueEndedEvent {
    pub npc: Entity,
    pub outcome: DialogueOutcome,
    pub final_price: Option<f32>,
}
