use strum::{Display, EnumCount, EnumIter, VariantArray};

/// Battery level of the robot
#[derive(Display, EnumIter, VariantArray, EnumCount, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum BatteryState {
    Low = 0,
    High = 1,
}

impl BatteryState {
    /// The state every episode starts in
    pub const INITIAL: Self = Self::High;

    /// Row index of this state in a [`ValueTable`](crate::algo::tabular::ValueTable)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Actions available to the robot
#[derive(Display, EnumIter, VariantArray, EnumCount, Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Action {
    Search = 0,
    Wait = 1,
    Recharge = 2,
}

impl Action {
    /// Column index of this action in a [`ValueTable`](crate::algo::tabular::ValueTable)
    pub const fn index(self) -> usize {
        self as usize
    }
}

const LOW_ACTIONS: [Action; 3] = [Action::Search, Action::Wait, Action::Recharge];
const HIGH_ACTIONS: [Action; 2] = [Action::Search, Action::Wait];

/// The actions permitted in `state`
///
/// Recharging a full battery is not an action the robot can take, so it is absent
/// from the `High` set. Both action selection and the TD backup go through here.
pub fn legal_actions(state: BatteryState) -> &'static [Action] {
    match state {
        BatteryState::Low => &LOW_ACTIONS,
        BatteryState::High => &HIGH_ACTIONS,
    }
}

/// Check whether `action` may be taken in `state`
pub fn is_legal(state: BatteryState, action: Action) -> bool {
    legal_actions(state).contains(&action)
}
