//! Customer state machine: walk to the counter, wait, talk, leave.
use std::fmt;

use bevy::prelude::*;

use super::patience::{PatiencePolicy, PatienceTimer};

/// Arrival tolerance used when none is configured.
pub const DEFAULT_ARRIVAL_EPSILON: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NpcState {
    #[default]
    Idle,
    Walking,
    WaitingAtCounter,
    Talking,
}

impl fmt::Display for NpcState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::WaitingAtCounter => "waiting at counter",
            Self::Talking => "talking",
        };
        f.write_str(label)
    }
}

/// Result of evaluating the state machine for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NpcTransition {
    None,
    StartedWalking,
    /// Arrived at the counter; the patience timer was armed.
    ArrivedAtCounter,
    /// Patience ran out; heading back to the exit.
    LostPatience,
    /// Reached the exit while leaving; the actor should be removed.
    Departed,
}

/// Per-customer state machine. Navigation and the countdown live on sibling
/// components; the brain only decides destinations and when to arm the timer.
#[derive(Component, Debug, Clone)]
pub struct NpcBrain {
    state: NpcState,
    target_position: Vec3,
    exit_position: Vec3,
    is_leaving: bool,
    timer_expired: bool,
    arrival_epsilon: f32,
}

impl NpcBrain {
    /// Creates a brain for an actor spawned at `spawn`. Without a target the
    /// actor stays where it spawned.
    pub fn new(spawn: Vec3, target: Option<Vec3>) -> Self {
        Self {
            state: NpcState::Idle,
            target_position: target.unwrap_or(spawn),
            exit_position: spawn,
            is_leaving: false,
            timer_expired: false,
            arrival_epsilon: DEFAULT_ARRIVAL_EPSILON,
        }
    }

    pub fn with_arrival_epsilon(mut self, epsilon: f32) -> Self {
        self.arrival_epsilon = epsilon.max(f32::EPSILON);
        self
    }

    pub fn state(&self) -> NpcState {
        self.state
    }

    pub fn target_position(&self) -> Vec3 {
        self.target_position
    }

    pub fn exit_position(&self) -> Vec3 {
        self.exit_position
    }

    pub fn is_leaving(&self) -> bool {
        self.is_leaving
    }

    /// Records that the patience countdown expired; consumed on the next step.
    pub fn notify_patience_expired(&mut self) {
        self.timer_expired = true;
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn has_pending_expiry(&self) -> bool {
        self.timer_expired
    }

    fn arrived(&self, position: Vec3) -> bool {
        position.distance(self.target_position) <= self.arrival_epsilon
    }

    /// Evaluates one tick. Suspended while talking.
    pub fn step(
        &mut self,
        position: Vec3,
        timer: &mut PatienceTimer,
        wait_time_at_counter: f32,
    ) -> NpcTransition {
        match self.state {
            NpcState::Idle => {
                if self.arrived(position) {
                    return NpcTransition::None;
                }
                self.state = NpcState::Walking;
                NpcTransition::StartedWalking
            }
            NpcState::Walking => {
                if !self.arrived(position) {
                    return NpcTransition::None;
                }
                if self.is_leaving {
                    return NpcTransition::Departed;
                }
                timer.start(wait_time_at_counter);
                self.state = NpcState::WaitingAtCounter;
                NpcTransition::ArrivedAtCounter
            }
            NpcState::WaitingAtCounter => {
                if !self.timer_expired {
                    return NpcTransition::None;
                }
                self.timer_expired = false;
                self.begin_leaving();
                NpcTransition::LostPatience
            }
            NpcState::Talking => NpcTransition::None,
        }
    }

    /// Suspends the machine for a conversation and applies `policy` to the countdown.
    pub fn begin_talking(&mut self, timer: &mut PatienceTimer, policy: PatiencePolicy) {
        self.state = NpcState::Talking;
        match policy {
            PatiencePolicy::KeepRunning => {}
            PatiencePolicy::Pause => timer.pause(),
            PatiencePolicy::Cancel => {
                timer.cancel();
                self.timer_expired = false;
            }
        }
    }

    /// Ends a conversation: the customer has been served and walks out.
    pub fn finish_talking(&mut self, timer: &mut PatienceTimer) {
        if self.state != NpcState::Talking {
            return;
        }
        timer.cancel();
        self.timer_expired = false;
        self.begin_leaving();
    }

    fn begin_leaving(&mut self) {
        self.target_position = self.exit_position;
        self.is_leaving = true;
        self.state = NpcState::Walking;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const SPAWN: Vec3 = Vec3::new(0.0, 0.0, 10.0);
    const COUNTER: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    #[test]
    fn idle_starts_walking_when_target_is_far() {
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));
        let mut timer = PatienceTimer::default();

        assert_eq!(brain.step(SPAWN, &mut timer, 2.0), NpcTransition::StartedWalking);
        assert_eq!(brain.state(), NpcState::Walking);
    }

    #[test]
    fn missing_target_walks_nowhere() {
        let mut brain = NpcBrain::new(SPAWN, None);
        let mut timer = PatienceTimer::default();

        for _ in 0..5 {
            assert_eq!(brain.step(SPAWN, &mut timer, 2.0), NpcTransition::None);
        }
        assert_eq!(brain.state(), NpcState::Idle);
        assert_eq!(brain.target_position(), SPAWN);
    }

    #[test]
    fn arrival_arms_exactly_one_timer() {
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));
        let mut timer = PatienceTimer::default();
        brain.step(SPAWN, &mut timer, 2.0);

        assert_eq!(brain.step(Vec3::new(0.0, 0.0, 5.0), &mut timer, 2.0), NpcTransition::None);
        assert!(!timer.is_active());

        let near_counter = Vec3::new(0.05, 0.0, 0.05);
        assert_eq!(
            brain.step(near_counter, &mut timer, 2.0),
            NpcTransition::ArrivedAtCounter
        );
        assert_eq!(brain.state(), NpcState::WaitingAtCounter);
        assert!(timer.is_active());
        assert_eq!(timer.duration(), 2.0);

        assert_eq!(brain.step(near_counter, &mut timer, 2.0), NpcTransition::None);
        assert_eq!(brain.state(), NpcState::WaitingAtCounter);
    }

    #[test]
    fn expiry_sends_customer_back_to_spawn_and_removes_on_arrival() {
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));
        let mut timer = PatienceTimer::default();
        brain.step(SPAWN, &mut timer, 2.0);
        brain.step(COUNTER, &mut timer, 2.0);

        assert!(timer.tick(Duration::from_secs(2)));
        brain.notify_patience_expired();
        assert_eq!(brain.step(COUNTER, &mut timer, 2.0), NpcTransition::LostPatience);
        assert!(brain.is_leaving());
        assert!(!brain.has_pending_expiry());
        assert_eq!(brain.target_position(), SPAWN);
        assert_eq!(brain.state(), NpcState::Walking);

        assert_eq!(brain.step(SPAWN, &mut timer, 2.0), NpcTransition::Departed);
        assert!(!timer.is_active());
    }

    #[test]
    fn talking_suspends_evaluation() {
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));
        let mut timer = PatienceTimer::default();
        brain.step(SPAWN, &mut timer, 2.0);
        brain.step(COUNTER, &mut timer, 2.0);

        brain.begin_talking(&mut timer, PatiencePolicy::KeepRunning);
        brain.notify_patience_expired();
        assert_eq!(brain.step(COUNTER, &mut timer, 2.0), NpcTransition::None);
        assert_eq!(brain.state(), NpcState::Talking);
    }

    #[test]
    fn talking_policies_apply_to_timer() {
        let mut timer = PatienceTimer::default();
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));

        timer.start(3.0);
        brain.begin_talking(&mut timer, PatiencePolicy::Pause);
        assert!(timer.is_paused());
        assert!(!timer.tick(Duration::from_secs(5)));

        timer.start(3.0);
        brain.begin_talking(&mut timer, PatiencePolicy::Cancel);
        assert!(!timer.is_active());

        timer.start(3.0);
        brain.begin_talking(&mut timer, PatiencePolicy::KeepRunning);
        assert!(timer.tick(Duration::from_secs(3)));
    }

    #[test]
    fn finishing_a_conversation_heads_for_the_exit() {
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));
        let mut timer = PatienceTimer::default();
        brain.step(SPAWN, &mut timer, 2.0);
        brain.step(COUNTER, &mut timer, 2.0);
        brain.begin_talking(&mut timer, PatiencePolicy::Pause);

        brain.finish_talking(&mut timer);
        assert_eq!(brain.state(), NpcState::Walking);
        assert!(brain.is_leaving());
        assert!(!timer.is_active());
        assert_eq!(brain.step(SPAWN, &mut timer, 2.0), NpcTransition::Departed);
    }

    #[test]
    fn finish_without_talking_is_ignored() {
        let mut brain = NpcBrain::new(SPAWN, Some(COUNTER));
        let mut timer = PatienceTimer::default();
        brain.finish_talking(&mut timer);
        assert_eq!(brain.state(), NpcState::Idle);
        assert!(!brain.is_leaving());
    }
}
