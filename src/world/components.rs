//! Components and resources used by the world module.
use bevy::prelude::*;

/// Fixed points of the shop floor that customers and the player use.
#[derive(Resource, Debug, Clone)]
pub struct ShopLayout {
    /// Where customers enter and where they leave again.
    pub door: Vec3,
    /// Spot in front of the counter where customers wait.
    pub customer_spot: Vec3,
    /// Centre of the counter block.
    pub counter: Vec3,
    /// Where the player starts, behind the counter.
    pub player_start: Vec3,
}

impl Default for ShopLayout {
    fn default() -> Self {
        Self {
            door: Vec3::new(0.0, 1.0, 12.0),
            customer_spot: Vec3::new(0.0, 1.0, 1.5),
            counter: Vec3::new(0.0, 0.5, 0.0),
            player_start: Vec3::new(0.0, 1.7, -1.0),
        }
    }
}

/// Marker component identifying the main directional light.
#[derive(Component, Default)]
pub struct PrimarySun;

/// Marker for the counter block the player stands behind.
#[derive(Component, Default)]
pub struct ShopCounter;
