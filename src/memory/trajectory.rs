use crate::state::{Action, BatteryState};

use super::Exp;

/// The states, actions and rewards recorded during one episode
///
/// The state sequence is never empty: an episode starts with [`BatteryState::INITIAL`]
/// already recorded, and each completed step adds one action, one reward and one state.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    states: Vec<BatteryState>,
    actions: Vec<Action>,
    rewards: Vec<f64>,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Trajectory {
    /// A fresh episode positioned at the initial state
    pub fn new() -> Self {
        Self {
            states: vec![BatteryState::INITIAL],
            actions: Vec::new(),
            rewards: Vec::new(),
        }
    }

    /// Discard the recorded episode and start over at the initial state
    pub fn reset(&mut self) {
        self.states.clear();
        self.actions.clear();
        self.rewards.clear();
        self.states.push(BatteryState::INITIAL);
    }

    pub fn push_state(&mut self, state: BatteryState) {
        self.states.push(state);
    }

    pub fn push_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn push_reward(&mut self, reward: f64) {
        self.rewards.push(reward);
    }

    /// The most recently recorded state
    pub fn last_state(&self) -> BatteryState {
        self.states
            .last()
            .copied()
            .unwrap_or(BatteryState::INITIAL)
    }

    pub fn states(&self) -> &[BatteryState] {
        &self.states
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Number of completed steps, i.e. those with an action, a reward and a successor state
    pub fn len(&self) -> usize {
        self.actions
            .len()
            .min(self.rewards.len())
            .min(self.states.len().saturating_sub(1))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the rewards received so far
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    /// The completed steps in the order they happened
    ///
    /// A step whose reward or successor state has not been recorded yet is left out.
    pub fn transitions(&self) -> impl Iterator<Item = Exp> + '_ {
        (0..self.len()).map(move |k| Exp {
            state: self.states[k],
            action: self.actions[k],
            reward: self.rewards[k],
            next_state: self.states[k + 1],
        })
    }
}
