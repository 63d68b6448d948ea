//! Patience countdown owned by each customer, plus the indicator it drives.
use std::{fmt, time::Duration};

use bevy::{color::Mix, prelude::*};
use serde::Deserialize;

/// What happens to a running countdown while its customer is talking.
///
/// Customers always leave once the conversation ends, so the policy only
/// shapes the conversation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatiencePolicy {
    /// Countdown keeps depleting; expiry walks the customer out mid-conversation.
    KeepRunning,
    /// Countdown freezes and the indicator keeps showing the patience left.
    #[default]
    Pause,
    /// Countdown is torn down without expiring and the indicator disappears.
    Cancel,
}

impl fmt::Display for PatiencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::KeepRunning => "keep running",
            Self::Pause => "pause",
            Self::Cancel => "cancel",
        };
        f.write_str(label)
    }
}

/// Countdown that depletes over its duration and expires once.
///
/// Polled each tick: `tick` reports expiry exactly once per `start`.
#[derive(Component, Debug, Clone, Default)]
pub struct PatienceTimer {
    timer: Option<Timer>,
}

impl PatienceTimer {
    /// (Re)arms the countdown from zero.
    pub fn start(&mut self, duration_seconds: f32) {
        self.timer = Some(Timer::from_seconds(
            duration_seconds.max(0.0),
            TimerMode::Once,
        ));
    }

    /// Advances the countdown, returning `true` on the tick it expires.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.timer
            .as_mut()
            .is_some_and(|timer| timer.tick(delta).just_finished())
    }

    /// Stops the countdown without expiring. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn pause(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.pause();
        }
    }

    /// Indicator is shown while armed, including while paused.
    pub fn is_active(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_paused(&self) -> bool {
        self.timer.as_ref().is_some_and(Timer::is_paused)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_expired(&self) -> bool {
        self.timer.as_ref().is_some_and(Timer::is_finished)
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn duration(&self) -> f32 {
        self.timer
            .as_ref()
            .map_or(0.0, |timer| timer.duration().as_secs_f32())
    }

    /// Interpolation parameter in `[0, 1]`, 0 at start and 1 at expiry.
    pub fn progress(&self) -> f32 {
        self.timer.as_ref().map_or(0.0, Timer::fraction)
    }

    /// Remaining fraction shown by the indicator.
    pub fn fill_fraction(&self) -> f32 {
        self.timer.as_ref().map_or(1.0, Timer::fraction_remaining)
    }
}

/// Indicator entity hovering over a customer's head.
#[derive(Component, Debug)]
pub struct PatienceIndicator {
    pub owner: Entity,
    pub material: Handle<StandardMaterial>,
    pub full_width: f32,
}

/// Linear blend between the start and end colour for a given progress.
pub fn indicator_color(start: Color, end: Color, progress: f32) -> Color {
    let start = start.to_srgba();
    let end = end.to_srgba();
    Color::Srgba(start.mix(&end, progress.clamp(0.0, 1.0)))
}
