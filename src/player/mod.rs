//! Player module - first-person shopkeeper: look, move, focus and talk.

pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PlayerPlugin;
