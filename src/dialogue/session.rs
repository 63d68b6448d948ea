//! Negotiation session state shared between the dialogue systems.
use std::fmt;

use bevy::prelude::*;

use super::errors::DialogueError;

/// One-shot continuation run when a session ends, whatever the outcome.
pub type DialogueCallback = Box<dyn FnOnce(&mut World, DialogueOutcome) + Send + Sync>;

/// One-shot continuation run when a standalone message is dismissed.
pub type MessageCallback = Box<dyn FnOnce(&mut World) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueChoice {
    Barter,
    Accept,
    Refuse,
}

impl DialogueChoice {
    pub const ALL: [DialogueChoice; 3] = [Self::Barter, Self::Accept, Self::Refuse];

    pub fn label(self) -> &'static str {
        match self {
            Self::Barter => "Barter",
            Self::Accept => "Accept",
            Self::Refuse => "Refuse",
        }
    }
}

impl fmt::Display for DialogueChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueOutcome {
    Accepted,
    Refused,
    /// Patience ran out mid-conversation and the customer walked out.
    WalkedOut,
    /// The customer vanished before the conversation could finish.
    Aborted,
}

impl DialogueOutcome {
    pub fn label(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::WalkedOut => "walked out",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for DialogueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which response line the flow is waiting on before it moves on.
///
/// `None` means the choices are on screen (or no session is running).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingChoice {
    #[default]
    None,
    AwaitingBarter,
    AwaitingAccept,
    AwaitingRefuse,
}

/// What the text box hands back when the player continues past a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextContinuation {
    PresentChoices,
    EndSession(DialogueOutcome),
    CloseMessage,
}

struct ActiveSession {
    npc: Entity,
    pending_choice: PendingChoice,
    choices_visible: bool,
    barter_rounds: u32,
    on_complete: Option<DialogueCallback>,
}

/// The single negotiation that may be running at a time.
#[derive(Resource, Default)]
pub struct DialogueSession {
    active: Option<ActiveSession>,
}

/// Everything left over from a session once it ends.
pub struct FinishedSession {
    pub npc: Entity,
    pub outcome: DialogueOutcome,
    pub barter_rounds: u32,
    pub on_complete: Option<DialogueCallback>,
}

impl fmt::Debug for FinishedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinishedSession")
            .field("npc", &self.npc)
            .field("outcome", &self.outcome)
            .field("barter_rounds", &self.barter_rounds)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

impl DialogueSession {
    /// Binds the session to `npc`. Fails while another session is running.
    pub fn begin(
        &mut self,
        npc: Entity,
        on_complete: Option<DialogueCallback>,
    ) -> Result<(), DialogueError> {
        if let Some(active) = &self.active {
            return Err(DialogueError::SessionAlreadyActive { active: active.npc });
        }

        self.active = Some(ActiveSession {
            npc,
            pending_choice: PendingChoice::None,
            choices_visible: false,
            barter_rounds: 0,
            on_complete,
        });
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_npc(&self) -> Option<Entity> {
        self.active.as_ref().map(|active| active.npc)
    }

    pub fn pending_choice(&self) -> PendingChoice {
        self.active
            .as_ref()
            .map(|active| active.pending_choice)
            .unwrap_or_default()
    }

    pub fn choices_visible(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.choices_visible)
    }

    pub fn barter_rounds(&self) -> u32 {
        self.active
            .as_ref()
            .map(|active| active.barter_rounds)
            .unwrap_or(0)
    }

    pub fn present_choices(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.pending_choice = PendingChoice::None;
            active.choices_visible = true;
        }
    }

    /// Accepts a choice only while the choices are on screen, then hides them.
    pub fn choose(&mut self, choice: DialogueChoice) -> Result<DialogueChoice, DialogueError> {
        let active = self.active.as_mut().ok_or(DialogueError::NoActiveSession)?;
        if !active.choices_visible {
            return Err(DialogueError::ChoicesHidden { choice });
        }

        active.choices_visible = false;
        active.pending_choice = match choice {
            DialogueChoice::Barter => {
                active.barter_rounds += 1;
                PendingChoice::AwaitingBarter
            }
            DialogueChoice::Accept => PendingChoice::AwaitingAccept,
            DialogueChoice::Refuse => PendingChoice::AwaitingRefuse,
        };
        Ok(choice)
    }

    /// Ends the session. Returns `None` if nothing was running, so the
    /// completion can only ever be handed out once.
    pub fn finish(&mut self, outcome: DialogueOutcome) -> Option<FinishedSession> {
        let active = self.active.take()?;
        Some(FinishedSession {
            npc: active.npc,
            outcome,
            barter_rounds: active.barter_rounds,
            on_complete: active.on_complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn counting_callback(counter: &Arc<AtomicUsize>) -> DialogueCallback {
        let counter = Arc::clone(counter);
        Box::new(move |_world, _outcome| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn second_session_is_rejected() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut session = DialogueSession::default();
        session.begin(first, None).expect("first session starts");
        let err = session.begin(second, None).expect_err("second must be rejected");
        assert!(matches!(err, DialogueError::SessionAlreadyActive { active } if active == first));
        assert_eq!(session.active_npc(), Some(first));
    }

    #[test]
    fn choices_are_ignored_until_presented() {
        let mut world = World::new();
        let npc = world.spawn_empty().id();
        let mut session = DialogueSession::default();

        assert!(matches!(
            session.choose(DialogueChoice::Accept),
            Err(DialogueError::NoActiveSession)
        ));

        session.begin(npc, None).unwrap();
        assert!(session.choose(DialogueChoice::Accept).is_err());

        session.present_choices();
        assert_eq!(session.choose(DialogueChoice::Barter).unwrap(), DialogueChoice::Barter);
        assert_eq!(session.pending_choice(), PendingChoice::AwaitingBarter);
        assert!(!session.choices_visible());
        assert!(session.choose(DialogueChoice::Accept).is_err());

        session.present_choices();
        assert_eq!(session.pending_choice(), PendingChoice::None);
        session.choose(DialogueChoice::Refuse).unwrap();
        assert_eq!(session.pending_choice(), PendingChoice::AwaitingRefuse);
        assert_eq!(session.barter_rounds(), 1);
    }

    #[test]
    fn completion_is_handed_out_exactly_once() {
        for outcome in [DialogueOutcome::Accepted, DialogueOutcome::Refused] {
            let mut world = World::new();
            let npc = world.spawn_empty().id();
            let counter = Arc::new(AtomicUsize::new(0));

            let mut session = DialogueSession::default();
            session.begin(npc, Some(counting_callback(&counter))).unwrap();

            let finished = session.finish(outcome).expect("session was active");
            assert_eq!(finished.outcome, outcome);
            if let Some(callback) = finished.on_complete {
                callback(&mut world, finished.outcome);
            }
            assert!(session.finish(outcome).is_none());
            assert!(!session.is_active());
            assert_eq!(counter.load(Ordering::SeqCst), 1);
        }
    }
}
