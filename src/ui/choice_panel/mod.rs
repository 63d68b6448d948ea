// src/ui/choice_panel/mod.rs
//
// Three-button choice row shown while a negotiation waits for the player.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::ChoicePanelPlugin;
