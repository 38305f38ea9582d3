use rand::Rng;

use crate::{
    decay::{Constant, Decay},
    error::ConfigError,
    util::is_probability,
};

use super::Choice;

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl Default for EpsilonGreedy<Constant> {
    /// A constant epsilon of `0.1`
    fn default() -> Self {
        Self {
            epsilon: Constant::new(0.1),
        }
    }
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    ///
    /// **Errors** if the schedule starts or ends outside of `[0,1]`
    pub fn new(decay: D) -> Result<Self, ConfigError> {
        for value in [decay.initial(), decay.terminal()] {
            if !is_probability(value) {
                return Err(ConfigError::OutOfUnitInterval {
                    name: "epsilon",
                    value,
                });
            }
        }
        Ok(Self { epsilon: decay })
    }

    /// The exploration probability for `episode`
    pub fn epsilon(&self, episode: u32) -> f64 {
        self.epsilon.evaluate(episode as f64)
    }

    /// Invoke epsilon greedy policy for current episode
    ///
    /// An epsilon of `0` always exploits and an epsilon of `1` always explores.
    pub fn choose<R: Rng + ?Sized>(&self, episode: u32, rng: &mut R) -> Choice {
        if rng.gen::<f64>() >= self.epsilon(episode) {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay::Linear;

    #[test]
    fn epsilon_greedy_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let greedy = EpsilonGreedy::new(Constant::new(0.0)).unwrap();
        let random = EpsilonGreedy::new(Constant::new(1.0)).unwrap();
        for episode in 0..1000 {
            assert_eq!(greedy.choose(episode, &mut rng), Choice::Exploit);
            assert_eq!(random.choose(episode, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn epsilon_follows_schedule() {
        let policy = EpsilonGreedy::new(Linear::new(0.1, 1.0, 0.2).unwrap()).unwrap();
        assert_eq!(policy.epsilon(0), 1.0);
        assert!((policy.epsilon(5) - 0.5).abs() < 1e-12);
        assert_eq!(policy.epsilon(100), 0.2);
    }

    #[test]
    fn rejects_out_of_range_epsilon() {
        assert!(EpsilonGreedy::new(Constant::new(1.5)).is_err());
        assert!(EpsilonGreedy::new(Constant::new(-0.1)).is_err());
        assert!(
            EpsilonGreedy::new(Linear::new(0.1, 2.0, 0.0).unwrap()).is_err(),
            "schedule starting above one is rejected"
        );
    }
}
