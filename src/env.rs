use rand::Rng;

/// The dynamics of a discrete-time Markov decision process
///
/// Implementors are stateless with respect to the episode: the current state is passed
/// in by the caller, and the same `(state, action)` pair always samples from the same
/// distribution over outcomes.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Copy;

    /// A representation of an action that an agent can take to affect the environment
    type Action: Copy;

    /// Raised when `action` is not permitted in `state`
    type Error: std::error::Error;

    /// Sample the outcome of taking `action` in `state`
    ///
    /// **Returns** `(next_state, reward)`
    fn step<R: Rng + ?Sized>(
        &self,
        state: Self::State,
        action: Self::Action,
        rng: &mut R,
    ) -> Result<(Self::State, f64), Self::Error>;
}
