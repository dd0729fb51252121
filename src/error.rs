//! Error type shared by every encoder and transform.
//!
//! Configuration errors surface when an encoder is built; input errors
//! surface when a tensor is encoded, always before any output is allocated.

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EncodeError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum EncodeError {
    #[error("simulation time must be positive and finite, got {0}")]
    InvalidTime(f64),

    #[error("time step dt must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("time {time} with dt {dt} yields zero simulation steps")]
    ZeroSteps { time: f64, dt: f64 },

    #[error("time {time} with dt {dt} yields more simulation steps than fit in memory")]
    TooManySteps { time: f64, dt: f64 },

    #[error("sparsity must lie in [0, 1], got {0}")]
    InvalidSparsity(f32),

    #[error("max_prob must lie in (0, 1], got {0}")]
    InvalidMaxProb(f32),

    #[error("input must be non-negative, found {value} at flat index {index}")]
    NegativeInput { index: usize, value: f32 },

    #[error("input must be finite, found {value} at flat index {index}")]
    NonFinite { index: usize, value: f32 },

    #[error("axis {axis} out of range for a {ndim}-dimensional input")]
    InvalidAxis { axis: usize, ndim: usize },

    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = EncodeError::InvalidMaxProb(1.5);
        assert_eq!(err.to_string(), "max_prob must lie in (0, 1], got 1.5");

        let err = EncodeError::NegativeInput { index: 3, value: -2.0 };
        assert!(err.to_string().contains("flat index 3"));
    }
}
