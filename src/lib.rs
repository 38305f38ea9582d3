//! Tabular TD control for the recycling robot MDP
//!
//! ```no_run
//! use recycling_robot::{
//!     algo::tabular::RobotConfig, gym::RecyclingRobotConfig, train::{train, TrainingConfig},
//! };
//!
//! # fn main() -> recycling_robot::Result<()> {
//! let report = train(
//!     RecyclingRobotConfig::default(),
//!     RobotConfig::default(),
//!     TrainingConfig::default(),
//! )?;
//! report.save_policy("policy.bin")?;
//! report.save_reward_log("rewards.txt")?;
//! # Ok(())
//! # }
//! ```

/// Implemented RL algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// Environments
pub mod gym;

/// Reward log persistence
pub mod io;

/// Episode recording
pub mod memory;

/// Battery states and actions
pub mod state;

/// Training loop
pub mod train;

mod util;

pub use error::{Error, Result};
