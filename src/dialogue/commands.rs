//! Commands that open a negotiation or queue a standalone message.
use std::collections::VecDeque;

use bevy::prelude::*;

use super::{
    errors::DialogueError,
    events::DialogueStartedEvent,
    lines::DialogueKey,
    session::{DialogueCallback, DialogueSession, MessageCallback},
};
use crate::{
    core::config::ShopConfig,
    npc::{
        components::{Identity, ShopNpc},
        patience::PatienceTimer,
        state::{NpcBrain, NpcState},
    },
    player::components::PointerCapture,
    ui::text_box::components::TextBox,
};

/// Opens a negotiation with the customer `npc`.
///
/// `on_complete` runs exactly once when the session ends, whatever the outcome.
pub struct StartDialogue {
    pub npc: Entity,
    pub on_complete: Option<DialogueCallback>,
}

impl StartDialogue {
    pub fn new(npc: Entity) -> Self {
        Self {
            npc,
            on_complete: None,
        }
    }

    pub fn on_complete(
        mut self,
        callback: impl FnOnce(&mut World, super::session::DialogueOutcome) + Send + Sync + 'static,
    ) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl Command for StartDialogue {
    fn apply(self, world: &mut World) {
        if let Err(err) = start_dialogue(world, self.npc, self.on_complete) {
            warn!("Dialogue not started: {}", err);
        }
    }
}

/// Binds the session to `npc`, suspends its state machine and shows the
/// opening line with the three choices.
pub fn start_dialogue(
    world: &mut World,
    npc: Entity,
    on_complete: Option<DialogueCallback>,
) -> Result<(), DialogueError> {
    if let Some(active) = world.resource::<DialogueSession>().active_npc() {
        return Err(DialogueError::SessionAlreadyActive { active });
    }

    let policy = world.resource::<ShopConfig>().patience.policy;
    let mut customers =
        world.query::<(&ShopNpc, &mut NpcBrain, &mut PatienceTimer, Option<&Identity>)>();
    let Ok((customer, mut brain, mut timer, identity)) = customers.get_mut(world, npc) else {
        return Err(DialogueError::NpcMissing { npc });
    };
    if brain.state() != NpcState::WaitingAtCounter {
        return Err(DialogueError::NpcNotWaiting {
            npc,
            state: brain.state(),
        });
    }

    let key = if customer.is_buyer() {
        DialogueKey::Buying
    } else {
        DialogueKey::Selling
    };
    let opening_line = customer.dialogue_lines.line(key).to_string();
    let speaker = identity.map(|identity| identity.display_name.clone());
    brain.begin_talking(&mut timer, policy);

    world
        .resource_mut::<DialogueSession>()
        .begin(npc, on_complete)?;

    if world.resource_mut::<MessageBoard>().supersede() {
        debug!("Standalone message superseded by a negotiation");
    }
    world.resource_mut::<PointerCapture>().release();

    {
        let mut text_box = world.resource_mut::<TextBox>();
        text_box.show();
        text_box.set_speaker(speaker.clone());
        text_box.display_text(opening_line, None);
    }
    world.resource_mut::<DialogueSession>().present_choices();
    world.write_message(DialogueStartedEvent { npc });

    info!(
        "Dialogue started with {} ({:?})",
        speaker.as_deref().unwrap_or("customer"),
        npc
    );
    Ok(())
}

/// Queues a one-shot line that is shown when the text box is free.
pub struct DisplayMessage {
    pub text: String,
    pub on_complete: Option<MessageCallback>,
}

impl DisplayMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            on_complete: None,
        }
    }

    #[allow(dead_code)]
    pub fn on_complete(mut self, callback: impl FnOnce(&mut World) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl Command for DisplayMessage {
    fn apply(self, world: &mut World) {
        world
            .resource_mut::<MessageBoard>()
            .enqueue(self.text, self.on_complete);
    }
}

struct QueuedMessage {
    text: String,
    on_complete: Option<MessageCallback>,
}

/// Standalone messages waiting for, or currently occupying, the text box.
#[derive(Resource, Default)]
pub struct MessageBoard {
    queue: VecDeque<QueuedMessage>,
    showing: bool,
    current_callback: Option<MessageCallback>,
}

impl MessageBoard {
    pub fn enqueue(&mut self, text: impl Into<String>, on_complete: Option<MessageCallback>) {
        self.queue.push_back(QueuedMessage {
            text: text.into(),
            on_complete,
        });
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_showing(&self) -> bool {
        self.showing
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Moves the next queued message on screen and returns its text.
    pub fn next_message(&mut self) -> Option<String> {
        if self.showing {
            return None;
        }
        let message = self.queue.pop_front()?;
        self.showing = true;
        self.current_callback = message.on_complete;
        Some(message.text)
    }

    /// Takes the dismissed message's callback. The outer `Option` is `None`
    /// when nothing was showing.
    pub fn close(&mut self) -> Option<Option<MessageCallback>> {
        if !self.showing {
            return None;
        }
        self.showing = false;
        Some(self.current_callback.take())
    }

    /// Drops the message on screen without running its callback.
    pub fn supersede(&mut self) -> bool {
        let was_showing = self.showing;
        self.showing = false;
        self.current_callback = None;
        was_showing
    }
}
