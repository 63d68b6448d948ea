//! Per-frame systems driving the negotiation flow.
use bevy::{ecs::system::SystemParam, prelude::*};

use super::{
    commands::{DisplayMessage, MessageBoard},
    events::{DialogueChoiceEvent, DialogueEndedEvent, TextContinuedEvent},
    ledger::{DealLedger, DealLog, DealRecord},
    lines::DialogueKey,
    session::{DialogueChoice, DialogueOutcome, DialogueSession, TextContinuation},
};
use crate::{
    core::plugin::SimulationClock,
    npc::{
        components::{Identity, ShopNpc},
        events::PatienceExpiredEvent,
    },
    player::components::PointerCapture,
    ui::text_box::components::TextBox,
};

/// Resources touched whenever a session or message closes.
#[derive(SystemParam)]
pub struct SessionControl<'w, 's> {
    commands: Commands<'w, 's>,
    session: ResMut<'w, DialogueSession>,
    board: ResMut<'w, MessageBoard>,
    text_box: ResMut<'w, TextBox>,
    pointer: ResMut<'w, PointerCapture>,
    ledger: ResMut<'w, DealLedger>,
    log: ResMut<'w, DealLog>,
    clock: Res<'w, SimulationClock>,
    customers: Query<'w, 's, (&'static ShopNpc, Option<&'static Identity>)>,
    ended: MessageWriter<'w, DialogueEndedEvent>,
}

impl SessionControl<'_, '_> {
    /// Hides the dialogue UI, recaptures the pointer, records the deal and
    /// queues the completion callback. Returns `false` if no session was running.
    pub fn end_dialogue(&mut self, outcome: DialogueOutcome) -> bool {
        let Some(finished) = self.session.finish(outcome) else {
            return false;
        };

        self.text_box.clear_text();
        self.text_box.set_speaker(None);
        self.text_box.hide();
        self.pointer.capture();

        let customer = self.customers.get(finished.npc).ok();
        let final_price = customer.map(|(npc, _)| npc.item_price);

        match (outcome, customer) {
            (DialogueOutcome::Aborted, _) | (_, None) => {
                warn!(
                    "Dialogue with {:?} ended as {}: customer no longer present",
                    finished.npc, outcome
                );
            }
            (_, Some((npc, identity))) => {
                let name = identity
                    .map(|identity| identity.display_name.clone())
                    .unwrap_or_else(|| format!("{:?}", finished.npc));
                match outcome {
                    DialogueOutcome::Accepted => {
                        info!("Deal accepted with {}! Price: {:.2}", name, npc.item_price);
                    }
                    DialogueOutcome::WalkedOut => {
                        info!("{} ran out of patience mid-deal.", name);
                    }
                    _ => info!("Deal refused by {}.", name),
                }

                let record = DealRecord {
                    occurred_at_seconds: self.clock.elapsed().as_secs_f64(),
                    npc: identity
                        .map(|identity| identity.id.to_string())
                        .unwrap_or_else(|| format!("{:?}", finished.npc)),
                    customer_name: name,
                    is_buyer: npc.is_buyer(),
                    price: npc.item_price,
                    barter_rounds: finished.barter_rounds,
                    outcome,
                };
                self.log.push(&record);
                self.ledger.push(record);
            }
        }

        if let Some(callback) = finished.on_complete {
            self.commands
                .queue(move |world: &mut World| callback(world, outcome));
        }

        self.ended.write(DialogueEndedEvent {
            npc: finished.npc,
            outcome,
            final_price,
        });
        true
    }

    /// Hides a dismissed standalone message and queues its callback.
    pub fn close_message(&mut self) {
        let Some(callback) = self.board.close() else {
            return;
        };
        if !self.session.is_active() {
            self.text_box.clear_text();
            self.text_box.hide();
        }
        if let Some(callback) = callback {
            self.commands.queue(move |world: &mut World| callback(world));
        }
    }
}

/// Ends the session if its customer disappeared mid-conversation.
pub fn abort_orphaned_session(mut control: SessionControl) {
    let Some(npc) = control.session.active_npc() else {
        return;
    };
    if control.customers.get(npc).is_err() {
        control.end_dialogue(DialogueOutcome::Aborted);
    }
}

/// Walks the customer out when their countdown expires mid-conversation.
///
/// Only reachable under [`PatiencePolicy::KeepRunning`]; the other policies
/// stop the countdown when the conversation starts.
///
/// [`PatiencePolicy::KeepRunning`]: crate::npc::patience::PatiencePolicy::KeepRunning
pub fn end_impatient_session(
    mut expired: MessageReader<PatienceExpiredEvent>,
    mut control: SessionControl,
) {
    for event in expired.read() {
        if control.session.active_npc() != Some(event.entity) {
            continue;
        }
        let name = control
            .customers
            .get(event.entity)
            .ok()
            .and_then(|(_, identity)| identity)
            .map(|identity| identity.display_name.clone())
            .unwrap_or_else(|| "The customer".to_string());
        if control.end_dialogue(DialogueOutcome::WalkedOut) {
            control
                .commands
                .queue(DisplayMessage::new(format!("{} got tired of waiting.", name)));
        }
    }
}

/// Acts on the continuation of a line the player moved past.
pub fn handle_text_continuations(
    mut continued: MessageReader<TextContinuedEvent>,
    mut control: SessionControl,
) {
    for event in continued.read() {
        match event.continuation {
            TextContinuation::PresentChoices => control.session.present_choices(),
            TextContinuation::EndSession(outcome) => {
                control.end_dialogue(outcome);
            }
            TextContinuation::CloseMessage => control.close_message(),
        }
    }
}

/// Resolves Barter / Accept / Refuse into the customer's response line.
pub fn handle_dialogue_choices(
    mut choices: MessageReader<DialogueChoiceEvent>,
    mut session: ResMut<DialogueSession>,
    mut text_box: ResMut<TextBox>,
    mut customers: Query<(&mut ShopNpc, Option<&Identity>)>,
) {
    for event in choices.read() {
        let Some(npc) = session.active_npc() else {
            debug!("Ignoring {} with no dialogue running", event.choice);
            continue;
        };
        let Ok((mut customer, identity)) = customers.get_mut(npc) else {
            continue;
        };
        if let Err(err) = session.choose(event.choice) {
            debug!("Ignoring choice: {}", err);
            continue;
        }

        let (line, continuation) = match event.choice {
            DialogueChoice::Barter => {
                let change = customer.barter_price_change();
                info!(
                    "{} barters: price {:.2} -> {:.2}",
                    identity
                        .map(|identity| identity.display_name.as_str())
                        .unwrap_or("customer"),
                    change.previous,
                    change.current
                );
                (
                    customer.dialogue_lines.line(DialogueKey::PriceRaised),
                    TextContinuation::PresentChoices,
                )
            }
            DialogueChoice::Accept => (
                customer.dialogue_lines.line(DialogueKey::Acceptance),
                TextContinuation::EndSession(DialogueOutcome::Accepted),
            ),
            DialogueChoice::Refuse => (
                customer.dialogue_lines.line(DialogueKey::Denial),
                TextContinuation::EndSession(DialogueOutcome::Refused),
            ),
        };
        text_box.display_text(line.to_string(), Some(continuation));
    }
}

/// Puts the next standalone message on screen once the box is free.
pub fn show_queued_messages(
    session: Res<DialogueSession>,
    mut board: ResMut<MessageBoard>,
    mut text_box: ResMut<TextBox>,
) {
    if session.is_active() {
        return;
    }
    let Some(text) = board.next_message() else {
        return;
    };
    text_box.show();
    text_box.set_speaker(None);
    text_box.display_text(text, Some(TextContinuation::CloseMessage));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        core::config::ShopConfig,
        dialogue::{commands::start_dialogue, errors::DialogueError, lines::DialogueLines},
        npc::{
            components::NpcId,
            patience::{PatiencePolicy, PatienceTimer},
            state::{NpcBrain, NpcState},
            systems::{finish_conversations, run_npc_state_machines, tick_patience_timers},
        },
        ui::{
            choice_panel::systems::handle_choice_hotkeys,
            text_box::systems::{handle_text_box_input, tick_text_box},
        },
    };

    #[derive(Resource, Default)]
    struct Completions(Vec<(DialogueOutcome, Option<NpcState>)>);

    fn dialogue_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(ShopConfig::default())
            .insert_resource(SimulationClock::default())
            .insert_resource(TextBox::new(0.05, true))
            .insert_resource(DealLog::new(
                std::env::temp_dir().join("shopfront_dialogue_test.jsonl"),
            ))
            .init_resource::<DialogueSession>()
            .init_resource::<MessageBoard>()
            .init_resource::<DealLedger>()
            .init_resource::<PointerCapture>()
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Completions>()
            .add_message::<DialogueChoiceEvent>()
            .add_message::<TextContinuedEvent>()
            .add_message::<DialogueEndedEvent>()
            .add_message::<crate::dialogue::events::DialogueStartedEvent>()
            .add_message::<crate::npc::events::NpcArrivedAtCounterEvent>()
            .add_message::<crate::npc::events::PatienceExpiredEvent>()
            .add_message::<crate::npc::events::NpcDepartedEvent>()
            .add_systems(
                Update,
                (
                    handle_text_box_input,
                    handle_choice_hotkeys,
                    abort_orphaned_session,
                    end_impatient_session,
                    handle_text_continuations,
                    handle_dialogue_choices,
                    show_queued_messages,
                    tick_text_box,
                    finish_conversations,
                    run_npc_state_machines,
                    tick_patience_timers,
                )
                    .chain(),
            );
        app
    }

    fn tap(app: &mut App, key: KeyCode) {
        app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
        app.update();
        let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
        keyboard.release(key);
        keyboard.clear();
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<SimulationClock>()
            .tick(Duration::from_secs_f32(seconds));
        app.update();
    }

    /// A customer already standing at the counter with its countdown running.
    fn waiting_customer(app: &mut App, npc: ShopNpc) -> Entity {
        let spawn = Vec3::new(0.0, 0.0, 4.0);
        let mut brain = NpcBrain::new(spawn, Some(Vec3::ZERO));
        let mut timer = PatienceTimer::default();
        brain.step(spawn, &mut timer, npc.wait_time_at_counter());
        brain.step(Vec3::ZERO, &mut timer, npc.wait_time_at_counter());
        assert_eq!(brain.state(), NpcState::WaitingAtCounter);

        app.world_mut()
            .spawn((
                Transform::default(),
                Identity::new(NpcId::new(7), "Mabel"),
                npc,
                brain,
                timer,
                crate::npc::navigation::NavAgent::new(3.0),
            ))
            .id()
    }

    fn recording_callback(world: &mut World, outcome: DialogueOutcome) {
        let npc = world.resource::<DialogueSession>().active_npc();
        let mut brains = world.query::<&NpcBrain>();
        let state = brains.iter(world).next().map(NpcBrain::state);
        assert!(npc.is_none(), "session should be closed before completion");
        world.resource_mut::<Completions>().0.push((outcome, state));
    }

    #[test]
    fn buyer_barters_then_accepts_with_default_lines() {
        let mut app = dialogue_app();
        let mut lines = DialogueLines::empty();
        lines.insert(DialogueKey::Buying, "I'd like to buy this.");
        let npc = waiting_customer(
            &mut app,
            ShopNpc::new(30.0, 10.0, true)
                .with_barter_step(0.1)
                .with_lines(lines),
        );

        start_dialogue(app.world_mut(), npc, Some(Box::new(recording_callback))).unwrap();
        assert_eq!(
            app.world().resource::<TextBox>().full_text(),
            "I'd like to buy this."
        );
        assert!(!app.world().resource::<PointerCapture>().is_locked());
        assert!(app.world().resource::<DialogueSession>().choices_visible());

        tap(&mut app, KeyCode::Digit1);
        let price = app.world().get::<ShopNpc>(npc).unwrap().item_price;
        assert!((price - 11.0).abs() < 1e-4);
        assert_eq!(
            app.world().resource::<TextBox>().full_text(),
            DialogueKey::PriceRaised.fallback()
        );
        assert!(!app.world().resource::<DialogueSession>().choices_visible());

        tap(&mut app, KeyCode::Space);
        tap(&mut app, KeyCode::Space);
        assert!(app.world().resource::<DialogueSession>().choices_visible());
        assert_eq!(app.world().resource::<DialogueSession>().barter_rounds(), 1);

        tap(&mut app, KeyCode::Digit2);
        assert_eq!(app.world().resource::<TextBox>().full_text(), "Deal!");
        assert!(app.world().resource::<Completions>().0.is_empty());

        tap(&mut app, KeyCode::Space);
        tap(&mut app, KeyCode::Space);

        assert_eq!(
            app.world().resource::<Completions>().0,
            vec![(DialogueOutcome::Accepted, Some(NpcState::Talking))]
        );
        assert!(app.world().get::<NpcBrain>(npc).unwrap().is_leaving());
        assert!(!app.world().resource::<TextBox>().is_visible());
        assert!(app.world().resource::<PointerCapture>().is_locked());

        let ledger = app.world().resource::<DealLedger>();
        let record = ledger.last().unwrap();
        assert_eq!(record.outcome, DialogueOutcome::Accepted);
        assert_eq!(record.barter_rounds, 1);
        assert_eq!(record.customer_name, "Mabel");

        tap(&mut app, KeyCode::Space);
        assert_eq!(app.world().resource::<Completions>().0.len(), 1);
    }

    #[test]
    fn refusal_ends_the_session_once() {
        let mut app = dialogue_app();
        let npc = waiting_customer(&mut app, ShopNpc::new(30.0, 10.0, false));
        start_dialogue(app.world_mut(), npc, Some(Box::new(recording_callback))).unwrap();

        tap(&mut app, KeyCode::Digit3);
        assert_eq!(
            app.world().resource::<TextBox>().full_text(),
            "No thanks, I changed my mind."
        );
        assert!(!app.world().resource::<DialogueSession>().choices_visible());

        tap(&mut app, KeyCode::Space);
        tap(&mut app, KeyCode::Space);
        tap(&mut app, KeyCode::Space);

        let completions = &app.world().resource::<Completions>().0;
        assert_eq!(completions.len(), 1);
        assert_eq!(completions[0].0, DialogueOutcome::Refused);
        assert!(!app.world().resource::<DialogueSession>().is_active());
    }

    fn talking_customer(policy: PatiencePolicy) -> (App, Entity) {
        let mut app = dialogue_app();
        app.world_mut().resource_mut::<ShopConfig>().patience.policy = policy;
        let npc = waiting_customer(&mut app, ShopNpc::new(1.0, 10.0, true));
        start_dialogue(app.world_mut(), npc, Some(Box::new(recording_callback))).unwrap();
        assert_eq!(
            app.world().get::<NpcBrain>(npc).unwrap().state(),
            NpcState::Talking
        );
        (app, npc)
    }

    #[test]
    fn paused_patience_holds_through_a_long_conversation() {
        let (mut app, npc) = talking_customer(PatiencePolicy::Pause);
        let timer = app.world().get::<PatienceTimer>(npc).unwrap();
        assert!(timer.is_active());
        assert!(timer.is_paused());

        advance(&mut app, 5.0);

        let timer = app.world().get::<PatienceTimer>(npc).unwrap();
        assert!(timer.is_active());
        assert_eq!(timer.fill_fraction(), 1.0);
        assert_eq!(
            app.world().get::<NpcBrain>(npc).unwrap().state(),
            NpcState::Talking
        );
        assert_eq!(app.world().resource::<DialogueSession>().active_npc(), Some(npc));
        assert!(app.world().resource::<Completions>().0.is_empty());
    }

    #[test]
    fn cancelled_patience_disappears_for_the_conversation() {
        let (mut app, npc) = talking_customer(PatiencePolicy::Cancel);
        assert!(!app.world().get::<PatienceTimer>(npc).unwrap().is_active());

        advance(&mut app, 5.0);

        assert!(!app.world().get::<PatienceTimer>(npc).unwrap().is_expired());
        assert_eq!(
            app.world().get::<NpcBrain>(npc).unwrap().state(),
            NpcState::Talking
        );
        assert_eq!(app.world().resource::<DialogueSession>().active_npc(), Some(npc));
        assert!(app.world().resource::<Completions>().0.is_empty());
    }

    #[test]
    fn running_patience_walks_the_customer_out_mid_conversation() {
        let (mut app, npc) = talking_customer(PatiencePolicy::KeepRunning);
        let timer = app.world().get::<PatienceTimer>(npc).unwrap();
        assert!(timer.is_active());
        assert!(!timer.is_paused());

        advance(&mut app, 0.5);
        assert!(app.world().resource::<DialogueSession>().is_active());

        advance(&mut app, 1.0);
        assert!(app.world().get::<PatienceTimer>(npc).unwrap().is_expired());

        advance(&mut app, 0.0);
        assert_eq!(
            app.world().resource::<Completions>().0,
            vec![(DialogueOutcome::WalkedOut, Some(NpcState::Talking))]
        );
        assert!(!app.world().resource::<DialogueSession>().is_active());
        assert!(app.world().get::<NpcBrain>(npc).unwrap().is_leaving());
        assert!(app.world().resource::<PointerCapture>().is_locked());
        assert_eq!(
            app.world().resource::<DealLedger>().last().unwrap().outcome,
            DialogueOutcome::WalkedOut
        );

        advance(&mut app, 0.0);
        assert!(app.world().resource::<MessageBoard>().is_showing());
        assert_eq!(
            app.world().resource::<TextBox>().full_text(),
            "Mabel got tired of waiting."
        );
        assert_eq!(app.world().resource::<Completions>().0.len(), 1);
    }

    #[test]
    fn second_start_and_busy_customers_are_rejected() {
        let mut app = dialogue_app();
        let first = waiting_customer(&mut app, ShopNpc::new(30.0, 10.0, true));
        let second = waiting_customer(&mut app, ShopNpc::new(30.0, 10.0, true));
        start_dialogue(app.world_mut(), first, None).unwrap();

        assert!(matches!(
            start_dialogue(app.world_mut(), second, None),
            Err(DialogueError::SessionAlreadyActive { active }) if active == first
        ));

        app.world_mut()
            .resource_mut::<DialogueSession>()
            .finish(DialogueOutcome::Refused);
        assert!(matches!(
            start_dialogue(app.world_mut(), first, None),
            Err(DialogueError::NpcNotWaiting { state: NpcState::Talking, .. })
        ));
    }

    #[test]
    fn vanished_customer_aborts_the_session() {
        let mut app = dialogue_app();
        let npc = waiting_customer(&mut app, ShopNpc::new(30.0, 10.0, true));
        start_dialogue(app.world_mut(), npc, Some(Box::new(recording_callback))).unwrap();

        app.world_mut().entity_mut(npc).despawn();
        app.update();
        app.update();

        assert_eq!(
            app.world().resource::<Completions>().0,
            vec![(DialogueOutcome::Aborted, None)]
        );
        assert!(!app.world().resource::<DialogueSession>().is_active());
        assert!(app.world().resource::<DealLedger>().last().is_none());
    }

    #[test]
    fn queued_message_waits_for_the_session_and_closes_on_continue() {
        let mut app = dialogue_app();
        let npc = waiting_customer(&mut app, ShopNpc::new(30.0, 10.0, true));
        start_dialogue(app.world_mut(), npc, None).unwrap();
        app.world_mut()
            .resource_mut::<MessageBoard>()
            .enqueue("Bryn got tired of waiting.", None);

        app.update();
        assert!(!app.world().resource::<MessageBoard>().is_showing());

        tap(&mut app, KeyCode::Digit3);
        tap(&mut app, KeyCode::Space);
        tap(&mut app, KeyCode::Space);
        assert!(app.world().resource::<MessageBoard>().is_showing());
        assert_eq!(
            app.world().resource::<TextBox>().full_text(),
            "Bryn got tired of waiting."
        );

        tap(&mut app, KeyCode::Space);
        tap(&mut app, KeyCode::Space);
        assert!(!app.world().resource::<MessageBoard>().is_showing());
        assert!(!app.world().resource::<TextBox>().is_visible());
    }
}
