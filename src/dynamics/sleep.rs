use crate::{
    config::{DEFAULT_SLEEP_SPEED_LIMIT, DEFAULT_SLEEP_TIME_LIMIT},
    core::rigidbody::{RigidBody, SleepState},
    utils::allocator::Arena,
};

/// Puts slow bodies to sleep and decides when touching bodies wake them.
#[derive(Debug, Clone)]
pub struct SleepManager {
    pub enabled: bool,
    pub speed_limit: f32,
    pub time_limit: f32,
}

impl Default for SleepManager {
    fn default() -> Self {
        Self {
            enabled: true,
            speed_limit: DEFAULT_SLEEP_SPEED_LIMIT,
            time_limit: DEFAULT_SLEEP_TIME_LIMIT,
        }
    }
}

impl SleepManager {
    pub fn update_sleeping(&self, bodies: &mut Arena<RigidBody>, dt: f32) {
        if !self.enabled {
            return;
        }
        let limit_sq = self.speed_limit * self.speed_limit;

        for body in bodies.values_mut() {
            if !body.is_active() || !body.allow_sleep {
                continue;
            }
            let speed_sq = body.velocity.speed_squared();
            match body.sleep_state {
                SleepState::Awake if speed_sq < limit_sq => {
                    body.sleep_state = SleepState::Sleepy;
                    body.sleepy_time = 0.0;
                }
                SleepState::Sleepy if speed_sq > limit_sq => body.wake_up(),
                SleepState::Sleepy => {
                    body.sleepy_time += dt;
                    if body.sleepy_time > self.time_limit {
                        body.sleep();
                    }
                }
                _ => {}
            }
        }
    }

    /// A sleeping body touched by an awake one moving well above the speed
    /// limit has to wake up.
    pub fn should_wake(&self, sleeper: &RigidBody, toucher: &RigidBody) -> bool {
        sleeper.is_sleeping()
            && toucher.is_active()
            && toucher.velocity.speed_squared() >= 2.0 * self.speed_limit * self.speed_limit
    }
}
