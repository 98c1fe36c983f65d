use crate::{Error, Result};

/// A value that changes over time, used for the exploration rate
pub trait Decay {
    /// Calculate value at time `t`
    fn evaluate(&self, t: f32) -> f32;
}

fn validate(rate: f32, vi: f32, vf: f32) -> Result<()> {
    ((rate >= 0.0 && vi >= vf) || (rate < 0.0 && vi <= vf))
        .then_some(())
        .ok_or_else(|| Error::InvalidDecay {
            message: format!("`vi - vf` ({vi} - {vf}) must have same sign as `rate` ({rate})"),
        })
}

/// A constant value
///
/// A constant epsilon of `1.0` never stops exploring, which is how an agent behaves
/// when no decay is wired in at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl Decay for Constant {
    fn evaluate(&self, _t: f32) -> f32 {
        self.value
    }
}

/// v(t) = max(v<sub>i</sub> - rt, v<sub>f</sub>)
///
/// Subtracting a fixed amount per tick and flooring at a minimum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linear {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Linear {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Linear {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        if rate < 0.0 {
            (vi - rate * t).min(vf)
        } else {
            (vi - rate * t).max(vf)
        }
    }
}

/// v(t) = v<sub>f</sub> + (v<sub>i</sub> - v<sub>f</sub>) * e<sup>-rt</sup>
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exponential {
    rate: f32,
    vi: f32,
    vf: f32,
}

impl Exponential {
    pub fn new(rate: f32, vi: f32, vf: f32) -> Result<Self> {
        validate(rate, vi, vf)?;
        Ok(Self { rate, vi, vf })
    }
}

impl Decay for Exponential {
    fn evaluate(&self, t: f32) -> f32 {
        let &Self { rate, vi, vf } = self;
        vf + (vi - vf) * (-rate * t).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_functional() {
        assert!(validate(1.0, 1.0, 0.0).is_ok());
        assert!(validate(0.0, 1.0, 1.0).is_ok(), "flat schedule is allowed");
        assert!(matches!(
            validate(1.0, -1.0, 0.0),
            Err(Error::InvalidDecay { .. })
        ));
        assert!(validate(-1.0, 1.0, 0.0).is_err());
        assert!(validate(-1.0, -1.0, 0.0).is_ok());
    }

    #[test]
    fn constant_decay() {
        let x = Constant::new(1.0);
        assert_eq!(x.evaluate(0.0), 1.0);
        assert_eq!(x.evaluate(1e6), 1.0);
    }

    #[test]
    fn linear_decay() {
        let x = Linear::new(0.5, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 1.5);
        assert_eq!(x.evaluate(10.0), 0.5, "floored at the final value");
    }

    #[test]
    fn linear_decay_per_step_defaults() {
        // 500 * 0.005 / (10_000 * 200)
        let x = Linear::new(1.25e-6, 1.0, 0.005).unwrap();
        assert!((x.evaluate(400_000.0) - 0.5).abs() < 1e-4);
        assert_eq!(x.evaluate(2_000_000.0), 0.005);
    }

    #[test]
    fn exponential_decay() {
        let x = Exponential::new(2.0, 2.0, 0.5).unwrap();
        assert_eq!(x.evaluate(0.0), 2.0);
        assert_eq!(x.evaluate(1.0), 0.5 + 1.5 * f32::exp(-2.0));
    }
}
