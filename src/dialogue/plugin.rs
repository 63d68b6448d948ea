//! Dialogue plugin wiring the negotiation session, message board and deal ledger.
use bevy::prelude::*;

use super::{
    commands::MessageBoard,
    events::{DialogueChoiceEvent, DialogueEndedEvent, DialogueStartedEvent, TextContinuedEvent},
    ledger::{flush_deal_log, DealLedger, DealLog},
    session::DialogueSession,
    systems::{
        abort_orphaned_session, end_impatient_session, handle_dialogue_choices,
        handle_text_continuations, show_queued_messages,
    },
};
use crate::core::plugin::ShopSet;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueSession>()
            .init_resource::<MessageBoard>()
            .init_resource::<DealLedger>()
            .init_resource::<DealLog>()
            .add_message::<DialogueChoiceEvent>()
            .add_message::<TextContinuedEvent>()
            .add_message::<DialogueStartedEvent>()
            .add_message::<DialogueEndedEvent>()
            .add_systems(
                Update,
                (
                    abort_orphaned_session,
                    end_impatient_session,
                    handle_text_continuations,
                    handle_dialogue_choices,
                    show_queued_messages,
                )
                    .chain()
                    .in_set(ShopSet::Dialogue),
            )
            .add_systems(PostUpdate, flush_deal_log);

        info!("DialoguePlugin registered");
    }
}
