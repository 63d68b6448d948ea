// src/ui/text_box/mod.rs
//
// Modal text box with typewriter reveal, shared by negotiations and messages.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::TextBoxPlugin;
