//! Dialogue module hosting the negotiation session, its commands and the deal ledger.
pub mod commands;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod lines;
pub mod plugin;
pub mod session;
pub mod systems;

pub use plugin::DialoguePlugin;
