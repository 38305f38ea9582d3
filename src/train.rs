use std::path::Path;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    algo::tabular::{ActionCounts, Robot, RobotConfig, ValueTable},
    decay::Decay,
    env::Environment,
    error::{ConfigError, Error, Result, StorageError},
    gym::{RecyclingRobot, RecyclingRobotConfig},
    io::write_reward_log,
    state::{Action, BatteryState},
};

/// Configuration for a training run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingConfig {
    /// Number of episodes
    ///
    /// **Default**: `1000`
    pub epochs: usize,
    /// Steps per episode
    ///
    /// **Default**: `1000`
    pub steps: usize,
    /// The robot backs up every `backup_interval` steps and again at the end of each episode
    ///
    /// When `steps` is a multiple of the interval the last step gets only the end-of-episode
    /// backup, not two in a row.
    ///
    /// **Default**: `200`
    pub backup_interval: usize,
    /// Seed for the run's random number generator, or `None` to seed from the OS
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            steps: 1000,
            backup_interval: 200,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("epochs", self.epochs),
            ("steps", self.steps),
            ("backup_interval", self.backup_interval),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Everything a finished run hands to reporting code
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Total reward of each episode, in order
    pub rewards: Vec<f64>,
    /// Actions taken across all episodes
    pub action_counts: ActionCounts,
    /// The learned value table
    pub table: ValueTable,
}

impl TrainingReport {
    pub fn save_reward_log<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        write_reward_log(path, &self.rewards)
    }

    pub fn save_policy<P: AsRef<Path>>(&self, path: P) -> Result<(), StorageError> {
        self.table.save(path)
    }
}

/// Drives a [`Robot`] through repeated fixed-length episodes of an [`Environment`]
pub struct Trainer<E, D>
where
    E: Environment<State = BatteryState, Action = Action>,
    D: Decay,
{
    env: E,
    robot: Robot<D>,
    config: TrainingConfig,
    rng: StdRng,
    rewards: Vec<f64>,
}

impl<E, D> Trainer<E, D>
where
    E: Environment<State = BatteryState, Action = Action>,
    Error: From<E::Error>,
    D: Decay,
{
    /// **Errors** if any count in `config` is zero
    pub fn new(env: E, robot: Robot<D>, config: TrainingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            env,
            robot,
            rng: config.rng(),
            rewards: Vec::with_capacity(config.epochs),
            config,
        })
    }

    pub fn robot(&self) -> &Robot<D> {
        &self.robot
    }

    /// Total rewards of the episodes run so far
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Run one episode, then reset the robot for the next
    ///
    /// **Returns** the episode's total reward
    pub fn run_epoch(&mut self) -> Result<f64> {
        let TrainingConfig {
            steps,
            backup_interval,
            ..
        } = self.config;

        for step in 1..=steps {
            let state = self.robot.state();
            let action = self.robot.select_action(&mut self.rng);
            let (next_state, reward) = self.env.step(state, action, &mut self.rng)?;
            self.robot.set_state(next_state);
            self.robot.set_reward(reward);

            if step % backup_interval == 0 && step != steps {
                self.robot.backup()?;
            }
        }
        self.robot.backup()?;

        let total = self.robot.trajectory().total_reward();
        debug!("Episode {} reward: {total}", self.robot.episode());
        self.rewards.push(total);
        self.robot.reset();
        Ok(total)
    }

    /// Run the configured number of episodes and hand back the results
    ///
    /// Rewards of episodes already played through [`run_epoch`](Self::run_epoch) are kept
    /// at the front of the series.
    pub fn run(mut self) -> Result<TrainingReport> {
        let epochs = self.config.epochs;
        let progress_every = (epochs / 10).max(1);
        info!(
            "Training for {epochs} epochs of {} steps",
            self.config.steps
        );

        for epoch in 1..=epochs {
            let total = self.run_epoch()?;
            if epoch % progress_every == 0 {
                info!("Epoch {epoch}/{epochs}: reward {total}");
            }
        }

        info!(
            "Finished training; final policy: low -> {}, high -> {}",
            self.robot.table().greedy_action(BatteryState::Low),
            self.robot.table().greedy_action(BatteryState::High)
        );
        Ok(TrainingReport {
            rewards: self.rewards,
            action_counts: *self.robot.action_counts(),
            table: self.robot.into_table(),
        })
    }
}

/// Train a fresh robot in a [`RecyclingRobot`] environment
pub fn train<D: Decay>(
    env_config: RecyclingRobotConfig,
    robot_config: RobotConfig<D>,
    config: TrainingConfig,
) -> Result<TrainingReport> {
    let env = RecyclingRobot::new(env_config)?;
    let robot = Robot::new(robot_config)?;
    Trainer::new(env, robot, config)?.run()
}

/// Run `runs` independent training runs one after another
///
/// With a seed configured, run `i` uses `seed + i`.
pub fn train_runs<D: Decay + Clone>(
    runs: usize,
    env_config: RecyclingRobotConfig,
    robot_config: RobotConfig<D>,
    config: TrainingConfig,
) -> Result<Vec<TrainingReport>> {
    (0..runs)
        .map(|i| {
            let config = TrainingConfig {
                seed: config.seed.map(|seed| seed.wrapping_add(i as u64)),
                ..config
            };
            info!("Starting run {}/{runs}", i + 1);
            train(env_config, robot_config.clone(), config)
        })
        .collect()
}

/// Per-epoch reward statistics across independent runs
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Mean total reward of each epoch
    pub mean: Vec<f64>,
    /// Sample standard deviation of each epoch's total reward, `NaN` for a single run
    pub std_dev: Vec<f64>,
}

impl RunSummary {
    /// Summarise the reward series of `reports`, truncated to the shortest one
    pub fn from_reports(reports: &[TrainingReport]) -> Self {
        let epochs = reports.iter().map(|r| r.rewards.len()).min().unwrap_or(0);
        let (mean, std_dev): (Vec<f64>, Vec<f64>) = (0..epochs)
            .map(|epoch| {
                let column: Vec<f64> = reports.iter().map(|r| r.rewards[epoch]).collect();
                mean_and_std_dev(&column)
            })
            .unzip();
        Self { mean, std_dev }
    }
}

fn mean_and_std_dev(samples: &[f64]) -> (f64, f64) {
    use statrs::statistics::Statistics;

    (samples.mean(), samples.std_dev())
}
