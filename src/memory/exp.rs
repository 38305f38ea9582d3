use crate::state::{Action, BatteryState};

/// Represents a single completed step of an episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp {
    /// The battery state before taking the action
    pub state: BatteryState,
    /// The action taken in the given state
    pub action: Action,
    /// The reward received after taking the action
    pub reward: f64,
    /// The battery state after the action is taken
    pub next_state: BatteryState,
}
