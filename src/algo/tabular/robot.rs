use std::path::Path;

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};
use strum::{EnumCount, VariantArray};

use crate::{
    decay::{self, Decay},
    error::{ConfigError, IllegalAction, StorageError},
    exploration::{Choice, EpsilonGreedy},
    memory::{Exp, Trajectory},
    state::{legal_actions, Action, BatteryState},
    util::is_probability,
};

use super::ValueTable;

/// Configuration for the [`Robot`]
#[derive(Debug, Clone)]
pub struct RobotConfig<D: Decay> {
    /// Exploration policy, with epsilon decaying over episodes
    ///
    /// **Default**: a [`Constant`](decay::Constant) epsilon of `0.1`
    pub exploration: EpsilonGreedy<D>,
    /// Step size of the TD backup, must be in `[0,1]`
    ///
    /// **Default**: `0.1`
    pub learning_rate: f64,
}

impl Default for RobotConfig<decay::Constant> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::default(),
            learning_rate: 0.1,
        }
    }
}

/// Number of times each action was taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCounts([u64; Action::COUNT]);

impl ActionCounts {
    pub fn get(&self, action: Action) -> u64 {
        self.0[action.index()]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, u64)> + '_ {
        Action::VARIANTS.iter().map(|&a| (a, self.get(a)))
    }

    fn record(&mut self, action: Action) {
        self.0[action.index()] += 1;
    }
}

/// A tabular TD control agent for the recycling robot
///
/// The robot records each episode as a [`Trajectory`] and learns by sweeping it with a
/// one-step backup whose target is the best legal value of the successor state:
///
/// Q(s,a) ← Q(s,a) + α(r + max<sub>a'</sub> Q(s',a') - Q(s,a))
///
/// No discount is applied to the successor value.
#[derive(Debug, Clone)]
pub struct Robot<D: Decay = decay::Constant> {
    table: ValueTable,
    trajectory: Trajectory,
    exploration: EpsilonGreedy<D>,
    learning_rate: f64,
    action_counts: ActionCounts,
    episode: u32,
}

impl<D: Decay> Robot<D> {
    /// Initialize a new `Robot` with a fresh [`ValueTable`]
    ///
    /// **Errors** if `learning_rate` is not in the interval `[0,1]`
    pub fn new(config: RobotConfig<D>) -> Result<Self, ConfigError> {
        Self::with_table(config, ValueTable::new())
    }

    /// Initialize a new `Robot` that continues from an existing table
    pub fn with_table(config: RobotConfig<D>, table: ValueTable) -> Result<Self, ConfigError> {
        if !is_probability(config.learning_rate) {
            return Err(ConfigError::OutOfUnitInterval {
                name: "learning_rate",
                value: config.learning_rate,
            });
        }
        Ok(Self {
            table,
            trajectory: Trajectory::new(),
            exploration: config.exploration,
            learning_rate: config.learning_rate,
            action_counts: ActionCounts::default(),
            episode: 0,
        })
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Actions taken across every episode so far
    pub fn action_counts(&self) -> &ActionCounts {
        &self.action_counts
    }

    /// Number of completed episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// The state the next action will be taken from
    pub fn state(&self) -> BatteryState {
        self.trajectory.last_state()
    }

    /// Choose an action for the current state and record it
    pub fn select_action<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Action {
        let state = self.state();
        let candidates = match self.exploration.choose(self.episode, rng) {
            Choice::Explore => legal_actions(state).to_vec(),
            Choice::Exploit => self.table.greedy_actions(state),
        };
        let action = candidates
            .choose(rng)
            .copied()
            .unwrap_or(legal_actions(state)[0]);

        trace!("{state} -> {action}");
        self.trajectory.push_action(action);
        self.action_counts.record(action);
        action
    }

    pub fn set_state(&mut self, state: BatteryState) {
        self.trajectory.push_state(state);
    }

    pub fn set_reward(&mut self, reward: f64) {
        self.trajectory.push_reward(reward);
    }

    /// Sweep the episode recorded so far and update the table in place
    ///
    /// Transitions are applied in order, so each one sees the updates made by those
    /// before it. The trajectory is left intact.
    ///
    /// **Returns** the number of transitions applied
    pub fn backup(&mut self) -> Result<usize, IllegalAction> {
        let mut applied = 0;
        for Exp {
            state,
            action,
            reward,
            next_state,
        } in self.trajectory.transitions()
        {
            let target = reward + self.table.max_legal(next_state);
            let td_error = target - self.table.get(state, action)?;
            self.table
                .update(state, action, self.learning_rate * td_error)?;
            applied += 1;
        }
        debug!("Backed up {applied} transitions in episode {}", self.episode);
        Ok(applied)
    }

    /// Clear the episode and start the next one from the initial state
    pub fn reset(&mut self) {
        self.trajectory.reset();
        self.episode += 1;
    }

    /// Persist the learned table
    pub fn save_policy<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        self.table.save(path)
    }

    /// Replace the table with one read from `path`
    pub fn load_policy<P: AsRef<Path>>(&mut self, path: P) -> Result<(), StorageError> {
        self.table = ValueTable::load(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay::Constant;

    fn robot(epsilon: f64, learning_rate: f64) -> Robot {
        Robot::new(RobotConfig {
            exploration: EpsilonGreedy::new(Constant::new(epsilon)).unwrap(),
            learning_rate,
        })
        .unwrap()
    }

    fn record(robot: &mut Robot, action: Action, reward: f64, next: BatteryState) {
        robot.trajectory.push_action(action);
        robot.set_reward(reward);
        robot.set_state(next);
    }

    #[test]
    fn backup_single_transition() {
        let mut robot = robot(0.1, 0.1);
        record(&mut robot, Action::Search, 3.5, BatteryState::Low);

        assert_eq!(robot.backup(), Ok(1));
        let updated = robot.table().get(BatteryState::High, Action::Search).unwrap();
        assert!((updated - 1.35).abs() < 1e-12, "1 + 0.1 * (3.5 + 1 - 1)");
        assert_eq!(robot.trajectory().len(), 1, "backup keeps the trajectory");
    }

    #[test]
    fn backup_is_sequential() {
        let mut robot = robot(0.1, 0.5);
        record(&mut robot, Action::Search, 2.0, BatteryState::High);
        record(&mut robot, Action::Wait, 0.0, BatteryState::High);
        robot.backup().unwrap();

        // First step: Q(H,S) = 1 + 0.5 * (2 + 1 - 1) = 2
        // Second step sees Q(H,S) = 2: Q(H,W) = 1 + 0.5 * (0 + 2 - 1) = 1.5
        assert_eq!(robot.table().get(BatteryState::High, Action::Search), Ok(2.0));
        assert_eq!(robot.table().get(BatteryState::High, Action::Wait), Ok(1.5));
    }

    #[test]
    fn backup_rejects_masked_transition() {
        let mut robot = robot(0.1, 0.1);
        record(&mut robot, Action::Recharge, 0.0, BatteryState::High);
        assert_eq!(
            robot.backup(),
            Err(IllegalAction {
                state: BatteryState::High,
                action: Action::Recharge,
            })
        );
    }

    #[test]
    fn greedy_selection_is_deterministic() {
        let mut robot = robot(0.0, 0.1);
        robot.table.update(BatteryState::High, Action::Wait, 0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert_eq!(robot.select_action(&mut rng), Action::Wait);
        }
        assert_eq!(robot.action_counts().get(Action::Wait), 200);
    }

    #[test]
    fn greedy_ties_are_random() {
        let mut robot = robot(0.0, 0.1);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            robot.select_action(&mut rng);
        }
        let counts = robot.action_counts();
        assert!(counts.get(Action::Search) > 50, "search wins some ties");
        assert!(counts.get(Action::Wait) > 50, "wait wins some ties");
        assert_eq!(counts.get(Action::Recharge), 0);
    }

    #[test]
    fn exploration_never_recharges_high_battery() {
        let mut robot = robot(1.0, 0.1);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10_000 {
            assert_ne!(robot.select_action(&mut rng), Action::Recharge);
        }
        assert_eq!(robot.action_counts().total(), 10_000);
    }

    #[test]
    fn reset_starts_a_new_episode() {
        let mut robot = robot(0.1, 0.1);
        record(&mut robot, Action::Search, 2.0, BatteryState::Low);
        robot.reset();
        robot.reset();

        assert_eq!(robot.trajectory().states(), [BatteryState::High]);
        assert!(robot.trajectory().actions().is_empty());
        assert!(robot.trajectory().rewards().is_empty());
        assert_eq!(robot.episode(), 2);
    }

    #[test]
    fn rejects_learning_rate_out_of_range() {
        let config = RobotConfig {
            learning_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            Robot::new(config),
            Err(ConfigError::OutOfUnitInterval {
                name: "learning_rate",
                ..
            })
        ));
    }
}
