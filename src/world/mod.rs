//! World module housing the shop environment and layout.
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::WorldPlugin;
