use std::{io, path::PathBuf};

use thiserror::Error;

use crate::state::{Action, BatteryState};

/// Rejected configuration, detected before any training happens
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("search reward ({search}) must be strictly greater than wait reward ({wait})")]
    SearchRewardNotGreater { search: f64, wait: f64 },

    #[error("`{name}` must be in the interval [0, 1], got {value}")]
    OutOfUnitInterval { name: &'static str, value: f64 },

    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("decay from {vi} to {vf} must move in the direction of rate {rate}")]
    DecayDirection { rate: f64, vi: f64, vf: f64 },
}

/// An action was applied in a battery state where it is not permitted
///
/// Only `Recharge` while the battery is `High` triggers this. Action masking makes it
/// unreachable, so seeing it means a bug upstream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("illegal action `{action}` in battery state `{state}`")]
pub struct IllegalAction {
    pub state: BatteryState,
    pub action: Action,
}

/// Raw values that do not form a valid [`ValueTable`](crate::algo::tabular::ValueTable)
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum InvalidTable {
    #[error("non-finite value {0}")]
    NonFinite(f64),

    #[error("masked cell holds {0}")]
    MaskedCell(f64),
}

/// Failure to persist or restore training artifacts
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no stored policy at {}", .0.display())]
    NotFound(PathBuf),

    #[error("corrupt policy file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("malformed reward log: {0}")]
    RewardLog(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Encoding(#[from] bincode::Error),
}

/// Any error produced by this crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    IllegalAction(#[from] IllegalAction),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
