//! Simulation horizon: total time, step size, and the derived step count.

use crate::error::{EncodeError, Result};

/// Relative slack applied before truncating `time / dt`, so that values like
/// `0.3 / 0.1` (2.9999999999999996 in f64) still yield 3 steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Time horizon over which a spike train is generated.
///
/// `num_steps = floor(time / dt)`. A remainder shorter than one step is
/// dropped; a horizon shorter than a single step is rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Horizon {
    time: f64,
    dt: f64,
    num_steps: usize,
}

impl Horizon {
    /// Validate `time` and `dt` and derive the step count.
    pub fn new(time: f64, dt: f64) -> Result<Self> {
        if !(time.is_finite() && time > 0.0) {
            return Err(EncodeError::InvalidTime(time));
        }
        if !(dt.is_finite() && dt > 0.0) {
            return Err(EncodeError::InvalidStep(dt));
        }

        let ratio = time / dt;
        let num_steps = (ratio * (1.0 + STEP_TOLERANCE)).floor();
        if num_steps < 1.0 {
            return Err(EncodeError::ZeroSteps { time, dt });
        }
        if num_steps >= usize::MAX as f64 {
            return Err(EncodeError::TooManySteps { time, dt });
        }

        Ok(Self { time, dt, num_steps: num_steps as usize })
    }

    /// Horizon of `steps` unit-length steps.
    pub fn steps(steps: usize) -> Result<Self> {
        Self::new(steps as f64, 1.0)
    }

    /// Total simulated time.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Duration of one step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of discrete steps in the spike train (always >= 1).
    #[inline]
    pub fn num_steps(&self) -> usize {
        self.num_steps
    }

    /// Whether `time` is an exact multiple of `dt` (nothing was truncated).
    pub fn is_exact(&self) -> bool {
        let covered = self.num_steps as f64 * self.dt;
        (self.time - covered).abs() <= self.time * STEP_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ratio() {
        let h = Horizon::new(10.0, 1.0).unwrap();
        assert_eq!(h.num_steps(), 10);
        assert!(h.is_exact());
    }

    #[test]
    fn float_noise_does_not_lose_a_step() {
        let h = Horizon::new(0.3, 0.1).unwrap();
        assert_eq!(h.num_steps(), 3);
    }

    #[test]
    fn remainder_is_truncated() {
        let h = Horizon::new(10.0, 3.0).unwrap();
        assert_eq!(h.num_steps(), 3);
        assert!(!h.is_exact());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(matches!(Horizon::new(0.0, 1.0), Err(EncodeError::InvalidTime(_))));
        assert!(matches!(Horizon::new(-5.0, 1.0), Err(EncodeError::InvalidTime(_))));
        assert!(matches!(Horizon::new(10.0, 0.0), Err(EncodeError::InvalidStep(_))));
        assert!(matches!(Horizon::new(10.0, f64::NAN), Err(EncodeError::InvalidStep(_))));
        assert!(matches!(Horizon::new(0.5, 1.0), Err(EncodeError::ZeroSteps { .. })));
    }

    #[test]
    fn step_count_overflow_is_not_reported_as_zero() {
        let err = Horizon::new(1.0e300, 1.0e-300).unwrap_err();
        assert!(matches!(err, EncodeError::TooManySteps { .. }));
        assert!(!err.to_string().contains("zero"));
        assert!(matches!(Horizon::new(f64::MAX, 0.5), Err(EncodeError::TooManySteps { .. })));
    }
}
