//! Core module hosting the simulation clock, tick ordering and shop configuration.
pub mod config;
pub mod plugin;

pub use plugin::CorePlugin;
