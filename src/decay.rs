use crate::error::ConfigError;

/// An implementation of a time-decaying value
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f64) -> f64;

    /// The value at `t = 0`
    fn initial(&self) -> f64 {
        self.evaluate(0.0)
    }

    /// The value approached as `t` grows without bound
    fn terminal(&self) -> f64;
}

fn validate(rate: f64, vi: f64, vf: f64) -> Result<(), ConfigError> {
    ((rate >= 0.0 && vi > vf) || (rate < 0.0 && vi < vf))
        .then_some(())
        .ok_or(ConfigError::DecayDirection { rate, vi, vf })
}

/// A constant value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f64) -> f64 {
        self.value
    }

    fn terminal(&self) -> f64 {
        self.value
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Exponential {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Exponential {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self, ConfigError> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }

    fn terminal(&self) -> f64 {
        if self.rate == 0.0 {
            self.vi
        } else {
            self.vf
        }
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linear {
    rate: f64,
    vi: f64,
    vf: f64,
}

impl Linear {
    pub fn new(rate: f64, vi: f64, vf: f64) -> Result<Self, ConfigError> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f64) -> f64 {
        let &Self { rate, vi, vf } = self;
        (vi - rate * t).max(vf)
    }

    fn terminal(&self) -> f64 {
        if self.rate == 0.0 {
            self.vi
        } else {
            self.vf
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(1.0, -1.0, 0.0).is_err());
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, -1.0, 0.0).is_ok());
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(0.1);
        assert_eq!(x.evaluate(0.0), 0.1);
        assert_eq!(x.evaluate(500.0), 0.1);
        assert_eq!(x.terminal(), 0.1);
    }

    #[test]
    fn exponential_decay() {
        let x = Exponential::new(2.0, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 0.5 + 1.5 * f64::exp(-2.0));
        assert_eq!(x.terminal(), 0.5);
    }

    #[test]
    fn linear_decay() {
        let x = Linear::new(0.5, 2.0, 0.5).unwrap();
        assert_eq!(x.initial(), 2.0);
        assert_eq!(x.evaluate(1.0), 1.5);
        assert_eq!(x.evaluate(10.0), 0.5);
        assert_eq!(x.terminal(), 0.5);
    }
}
