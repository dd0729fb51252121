//! Sign splitting for encoders that only accept non-negative magnitudes.
//!
//! `to_positive` stacks the positive part and the magnitude of the negative
//! part along a new axis; `from_positive` undoes it. The split is lossless:
//! `split[0] - split[1]` reproduces the input exactly.

use ndarray::{stack, ArrayBase, ArrayD, Axis, Data, Dimension, ErrorKind, ShapeError};

use crate::error::{EncodeError, Result};

/// Split `datum` into `max(x, 0)` and `max(-x, 0)`, stacked along a new axis
/// inserted at position `axis` (`0..=ndim`).
pub fn to_positive<S, D>(datum: &ArrayBase<S, D>, axis: usize) -> Result<ArrayD<f32>>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let ndim = datum.ndim();
    if axis > ndim {
        return Err(EncodeError::InvalidAxis { axis, ndim });
    }
    if let Some((index, &value)) = datum.iter().enumerate().find(|&(_, v)| !v.is_finite()) {
        return Err(EncodeError::NonFinite { index, value });
    }

    let datum = datum.view().into_dyn();
    let positive = datum.mapv(|x| x.max(0.0));
    let negative = datum.mapv(|x| (-x).max(0.0));
    Ok(stack(Axis(axis), &[positive.view(), negative.view()])?)
}

/// Recombine a tensor produced by [`to_positive`] with the same `axis`.
pub fn from_positive<S, D>(split: &ArrayBase<S, D>, axis: usize) -> Result<ArrayD<f32>>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let ndim = split.ndim();
    if axis >= ndim {
        return Err(EncodeError::InvalidAxis { axis, ndim });
    }
    if split.len_of(Axis(axis)) != 2 {
        return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
    }

    let split = split.view().into_dyn();
    Ok(&split.index_axis(Axis(axis), 0) - &split.index_axis(Axis(axis), 1))
}
