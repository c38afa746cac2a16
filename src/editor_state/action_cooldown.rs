//! Rate limiting for edit actions, so a held key doesn't place a voxel every frame.

use web_time::{Duration, Instant};

/// Minimum delay between two accepted edit actions.
pub const DEFAULT_ACTION_COOLDOWN: Duration = Duration::from_millis(150);

/// Gate that accepts an action only once the cooldown since the last accepted
/// action has strictly elapsed.
#[derive(Debug, Clone)]
pub struct ActionCooldown {
    interval: Duration,
    last_action: Option<Instant>,
}

impl ActionCooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_action: None,
        }
    }

    /// Accepts the action if the cooldown has elapsed, recording `now` as the
    /// time of the last action.
    ///
    /// The first action is always accepted.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = match self.last_action {
            Some(last) => now.saturating_duration_since(last) > self.interval,
            None => true,
        };

        if ready {
            self.last_action = Some(now);
        }
        ready
    }
}

impl Default for ActionCooldown {
    fn default() -> Self {
        Self::new(DEFAULT_ACTION_COOLDOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_action_is_accepted() {
        let mut cooldown = ActionCooldown::default();
        assert!(cooldown.try_fire(Instant::now()));
    }

    #[test]
    fn actions_inside_interval_are_rejected() {
        let mut cooldown = ActionCooldown::default();
        let start = Instant::now();

        assert!(cooldown.try_fire(start));
        assert!(!cooldown.try_fire(start + Duration::from_millis(100)));
        assert!(!cooldown.try_fire(start + Duration::from_millis(150)));
        assert!(cooldown.try_fire(start + Duration::from_millis(151)));
    }

    #[test]
    fn rejected_attempt_does_not_restart_the_interval() {
        let mut cooldown = ActionCooldown::new(Duration::from_millis(100));
        let start = Instant::now();

        assert!(cooldown.try_fire(start));
        assert!(!cooldown.try_fire(start + Duration::from_millis(90)));
        assert!(cooldown.try_fire(start + Duration::from_millis(110)));
    }
}
