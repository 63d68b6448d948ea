//! NPC module: customers, their patience and their walk to and from the counter.
pub mod components;
pub mod events;
pub mod navigation;
pub mod patience;
pub mod plugin;
pub mod spawning;
pub mod state;
pub mod systems;

pub use plugin::NpcPlugin;
