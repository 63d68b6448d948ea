//! Components and resources for the shopkeeper.
use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::core::config::PlayerSettings;

/// Mouse counts are scaled by this before the configured sensitivity.
const LOOK_DEGREES_PER_COUNT: f32 = 0.1;

/// Marker component identifying the player entity (attached to camera).
#[derive(Component, Debug)]
pub struct Player;

/// First-person look and movement state.
#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub yaw: f32,
    pub pitch: f32,
    pub velocity: Vec3,
    /// Set while a negotiation is running; look and movement are suspended.
    pub talking: bool,
}

impl PlayerController {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-FRAC_PI_2, FRAC_PI_2),
            velocity: Vec3::ZERO,
            talking: false,
        }
    }

    /// Applies a mouse delta. Pitch is clamped to straight up / straight down.
    pub fn apply_look(&mut self, mouse_delta: Vec2, sensitivity: f32) {
        let scale = (LOOK_DEGREES_PER_COUNT * sensitivity).to_radians();
        self.yaw -= mouse_delta.x * scale;
        self.pitch = (self.pitch - mouse_delta.y * scale).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::Y, self.yaw) * Quat::from_axis_angle(Vec3::X, self.pitch)
    }

    /// Eases velocity toward `wish * move_speed`; toward rest under friction
    /// when there is no input. Returns the displacement for this tick.
    pub fn steer(&mut self, wish: Vec3, settings: &PlayerSettings, delta_seconds: f32) -> Vec3 {
        let (target, rate) = if wish.length_squared() > 0.0 {
            (wish.normalize() * settings.move_speed, settings.acceleration)
        } else {
            (Vec3::ZERO, settings.friction)
        };
        let blend = (rate * delta_seconds).clamp(0.0, 1.0);
        self.velocity = self.velocity.lerp(target, blend);
        self.velocity * delta_seconds
    }
}

/// Whether the pointer is locked to the window for mouse look.
#[derive(Resource, Debug, Clone)]
pub struct PointerCapture {
    locked: bool,
}

impl Default for PointerCapture {
    fn default() -> Self {
        Self { locked: true }
    }
}

impl PointerCapture {
    /// Frees the pointer for clicking UI.
    pub fn release(&mut self) {
        self.locked = false;
    }

    pub fn capture(&mut self) {
        self.locked = true;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

/// Customer the player is currently looking at, if any can be talked to.
#[derive(Resource, Debug, Default, Clone)]
pub struct PlayerFocus {
    pub npc: Option<Entity>,
    pub name: Option<String>,
    pub distance: f32,
}

/// "[E] Talk to ..." hint.
#[derive(Component, Debug)]
pub struct InteractPrompt;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ShopConfig;

    #[test]
    fn pitch_is_clamped_to_vertical() {
        let mut controller = PlayerController::new(0.0, 0.0);
        controller.apply_look(Vec2::new(0.0, -100_000.0), 1.0);
        assert_eq!(controller.pitch, FRAC_PI_2);
        controller.apply_look(Vec2::new(0.0, 100_000.0), 1.0);
        assert_eq!(controller.pitch, -FRAC_PI_2);
    }

    #[test]
    fn movement_accelerates_then_coasts_to_rest() {
        let settings = ShopConfig::default().player;
        let mut controller = PlayerController::new(0.0, 0.0);

        let first = controller.steer(Vec3::Z, &settings, 0.05);
        let second = controller.steer(Vec3::Z, &settings, 0.05);
        assert!(second.z > first.z);
        assert!(controller.velocity.z <= settings.move_speed);

        for _ in 0..200 {
            controller.steer(Vec3::ZERO, &settings, 0.05);
        }
        assert!(controller.velocity.length() < 1e-3);
    }

    #[test]
    fn pointer_capture_toggles() {
        let mut pointer = PointerCapture::default();
        assert!(pointer.is_locked());
        pointer.release();
        assert!(!pointer.is_locked());
        pointer.capture();
        assert!(pointer.is_locked());
    }
}
