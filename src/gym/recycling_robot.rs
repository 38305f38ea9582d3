use rand::Rng;
use rand_distr::{Distribution, Standard};

use crate::{
    assert_interval,
    env::Environment,
    error::{ConfigError, IllegalAction},
    state::{Action, BatteryState},
    util::is_probability,
};

/// Reward for a search that drains the battery and forces a rescue
pub const RESCUE_REWARD: f64 = -3.0;

/// Parameters of the [`RecyclingRobot`] environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecyclingRobotConfig {
    /// Probability that the battery stays high after searching on a high battery
    ///
    /// **Default**: `0.5`
    pub alpha: f64,
    /// Probability that the battery stays low after searching on a low battery
    ///
    /// **Default**: `0.5`
    pub beta: f64,
    /// Reward for a successful search, must exceed `r_wait`
    ///
    /// **Default**: `2.0`
    pub r_search: f64,
    /// Reward for waiting
    ///
    /// **Default**: `1.0`
    pub r_wait: f64,
}

impl Default for RecyclingRobotConfig {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            beta: 0.5,
            r_search: 2.0,
            r_wait: 1.0,
        }
    }
}

impl RecyclingRobotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !is_probability(value) {
                return Err(ConfigError::OutOfUnitInterval { name, value });
            }
        }
        if self.r_search <= self.r_wait {
            return Err(ConfigError::SearchRewardNotGreater {
                search: self.r_search,
                wait: self.r_wait,
            });
        }
        Ok(())
    }
}

/// The recycling robot MDP from Sutton & Barto, example 3.3
///
/// A robot collects cans. With a high battery it can search or wait; with a low battery
/// it can also recharge. Searching may drain the battery, and searching on a low battery
/// may strand the robot, in which case it is rescued (and recharged) at a penalty.
#[derive(Debug, Clone)]
pub struct RecyclingRobot {
    config: RecyclingRobotConfig,
}

impl RecyclingRobot {
    /// **Errors** if `r_search <= r_wait` or a probability lies outside `[0,1]`
    pub fn new(config: RecyclingRobotConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RecyclingRobotConfig {
        &self.config
    }

    /// The outcome of taking `action` in `state` given a uniform `[0,1)` sample `draw`
    ///
    /// `draw` is only consulted by `Search`.
    ///
    /// **Panics** if `draw` is not in the interval `[0,1]`
    pub fn outcome(
        &self,
        state: BatteryState,
        action: Action,
        draw: f64,
    ) -> Result<(BatteryState, f64), IllegalAction> {
        assert_interval!(draw, 0.0, 1.0);
        let RecyclingRobotConfig {
            alpha,
            beta,
            r_search,
            r_wait,
        } = self.config;

        let outcome = match (state, action) {
            (BatteryState::Low, Action::Search) if draw < beta => (BatteryState::Low, r_search),
            (BatteryState::Low, Action::Search) => (BatteryState::High, RESCUE_REWARD),
            (BatteryState::Low, Action::Wait) => (BatteryState::Low, r_wait),
            (BatteryState::Low, Action::Recharge) => (BatteryState::High, 0.0),
            (BatteryState::High, Action::Search) if draw >= alpha => (BatteryState::Low, r_search),
            (BatteryState::High, Action::Search) => (BatteryState::High, r_search),
            (BatteryState::High, Action::Wait) => (BatteryState::High, r_wait),
            (BatteryState::High, Action::Recharge) => return Err(IllegalAction { state, action }),
        };
        Ok(outcome)
    }
}

impl Environment for RecyclingRobot {
    type State = BatteryState;
    type Action = Action;
    type Error = IllegalAction;

    fn step<R: Rng + ?Sized>(
        &self,
        state: BatteryState,
        action: Action,
        rng: &mut R,
    ) -> Result<(BatteryState, f64), IllegalAction> {
        let draw: f64 = match action {
            Action::Search => Standard.sample(rng),
            Action::Wait | Action::Recharge => 0.0,
        };
        self.outcome(state, action, draw)
    }
}
