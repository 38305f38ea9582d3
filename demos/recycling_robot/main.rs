use std::{error::Error, fs, path::Path};

use recycling_robot::{
    algo::tabular::RobotConfig,
    gym::RecyclingRobotConfig,
    state::BatteryState,
    train::{train, train_runs, RunSummary, TrainingConfig},
};

const NUM_RUNS: usize = 5;

fn main() -> Result<(), Box<dyn Error>> {
    let path = Path::new("demos/recycling_robot/out");
    fs::create_dir_all(path)?;

    let env_config = RecyclingRobotConfig::default();
    let config = TrainingConfig {
        seed: Some(0),
        ..Default::default()
    };

    let report = train(env_config, RobotConfig::default(), config)?;
    report.save_policy(path.join("policy.bin"))?;
    report.save_reward_log(path.join("rewards.txt"))?;

    println!("{}\n", report.table);
    for (action, count) in report.action_counts.iter() {
        println!("{action:>10}: {count}");
    }
    for state in [BatteryState::High, BatteryState::Low] {
        println!("{state:>10} -> {}", report.table.greedy_action(state));
    }

    let config = TrainingConfig {
        epochs: 200,
        ..config
    };
    let reports = train_runs(NUM_RUNS, env_config, RobotConfig::default(), config)?;
    let summary = RunSummary::from_reports(&reports);
    if let (Some(mean), Some(std_dev)) = (summary.mean.last(), summary.std_dev.last()) {
        println!("\nfinal epoch over {NUM_RUNS} runs: {mean:.1} ± {std_dev:.1}");
    }

    Ok(())
}
