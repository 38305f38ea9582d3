use std::fs;

use tempfile::tempdir;

use recycling_robot::{
    algo::tabular::{Robot, RobotConfig, ValueTable},
    decay::Exponential,
    error::{ConfigError, StorageError},
    exploration::EpsilonGreedy,
    gym::{RecyclingRobot, RecyclingRobotConfig},
    io::read_reward_log,
    state::{Action, BatteryState},
    train::{train, train_runs, RunSummary, Trainer, TrainingConfig},
    Error,
};

fn small_config(seed: u64) -> TrainingConfig {
    TrainingConfig {
        epochs: 20,
        steps: 500,
        backup_interval: 100,
        seed: Some(seed),
    }
}

fn env_config() -> RecyclingRobotConfig {
    RecyclingRobotConfig {
        alpha: 0.3,
        beta: 0.2,
        r_search: 3.5,
        r_wait: 0.5,
    }
}

#[test]
fn training_produces_collaborator_outputs() {
    let report = train(env_config(), RobotConfig::default(), small_config(9)).unwrap();

    assert_eq!(report.rewards.len(), 20, "one reward per epoch");
    assert!(report.rewards.iter().all(|r| r.is_finite()));
    assert_eq!(report.action_counts.total(), 20 * 500, "every step is counted");
    assert_eq!(
        report.table.rows()[BatteryState::High.index()][Action::Recharge.index()],
        0.0,
        "masked cell is never touched"
    );
}

#[test]
fn seeded_runs_are_reproducible() {
    let a = train(env_config(), RobotConfig::default(), small_config(4)).unwrap();
    let b = train(env_config(), RobotConfig::default(), small_config(4)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn independent_runs() {
    let reports = train_runs(3, env_config(), RobotConfig::default(), small_config(1)).unwrap();
    assert_eq!(reports.len(), 3);
    assert_ne!(reports[0].rewards, reports[1].rewards, "runs use distinct seeds");

    let summary = RunSummary::from_reports(&reports);
    assert_eq!(summary.mean.len(), 20);
    assert!(summary.std_dev.iter().all(|s| *s >= 0.0));
}

#[test]
fn decaying_exploration() {
    let exploration = EpsilonGreedy::new(Exponential::new(0.2, 1.0, 0.01).unwrap()).unwrap();
    let config = RobotConfig {
        exploration,
        learning_rate: 0.05,
    };
    let report = train(env_config(), config, small_config(2)).unwrap();
    assert_eq!(report.rewards.len(), 20);
}

#[test]
fn invalid_configuration_is_rejected_before_training() {
    let result = train(
        RecyclingRobotConfig {
            r_search: 0.5,
            r_wait: 0.5,
            ..env_config()
        },
        RobotConfig::default(),
        small_config(0),
    );
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::SearchRewardNotGreater { .. }))
    ));
}

#[test]
fn saved_policy_resumes_training() {
    let dir = tempdir().unwrap();
    let policy = dir.path().join("policy.bin");
    let rewards = dir.path().join("rewards.txt");

    let report = train(env_config(), RobotConfig::default(), small_config(6)).unwrap();
    report.save_policy(&policy).unwrap();
    report.save_reward_log(&rewards).unwrap();

    assert_eq!(read_reward_log(&rewards).unwrap(), report.rewards);
    let table = ValueTable::load(&policy).unwrap();
    assert_eq!(table, report.table);

    let mut robot = Robot::new(RobotConfig::default()).unwrap();
    robot.load_policy(&policy).unwrap();
    assert_eq!(robot.table(), &report.table);

    let env = RecyclingRobot::new(env_config()).unwrap();
    let resumed = Trainer::new(env, robot, small_config(7))
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(resumed.rewards.len(), 20);

    fs::remove_file(&policy).unwrap();
    assert!(matches!(
        ValueTable::load(&policy),
        Err(StorageError::NotFound(_))
    ));
}
