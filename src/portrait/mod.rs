//! Portrait module: 3×3 face grids for customers and their assembly from piece sets.
pub mod assembly;
pub mod components;
pub mod plugin;
pub mod systems;

pub use plugin::PortraitPlugin;
