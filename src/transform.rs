//! Spike-train transforms.
//!
//! Each transform maps a tensor of magnitudes to a freshly allocated spike
//! tensor shaped `(num_steps, ...input_shape)`. Element order along the
//! flattened axis is row-major (logical order), independent of the input's
//! memory layout.
//!
//! | Transform    | Values    | Random | Spikes per element        |
//! |--------------|-----------|--------|---------------------------|
//! | `single`     | 0/1       | no     | 0 or 1, always at step 0  |
//! | `repeat`     | input     | no     | input frame on every step |
//! | `bernoulli`  | 0/1       | yes    | 0..=num_steps             |
//! | `poisson`    | 0/1       | yes    | 0..=num_steps             |
//! | `rank_order` | 0/1       | no     | 0 or 1                    |

use ndarray::{Array2, ArrayBase, ArrayD, Axis, Data, Dimension, ErrorKind, IxDyn, ShapeError};
use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::error::{EncodeError, Result};
use crate::timing::Horizon;

/// Spike tensor: `(num_steps, ...input_shape)`, values 0 or 1.
pub type SpikeTensor = ArrayD<u8>;

/// Poisson sampling path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PoissonMode {
    /// Simulate exponential inter-spike intervals in continuous time and bin
    /// the arrivals. A bin fires with probability `1 - exp(-lambda)`, the
    /// chance that the Poisson process has at least one arrival in it.
    #[default]
    Exact,
    /// One independent draw per step with the first-order probability
    /// `p = min(lambda, 1)`, where `lambda = rate * dt / 1000`.
    ///
    /// Skips the exponential. It over-fires as `lambda` grows: at
    /// `lambda = 0.5` it fires on 50% of steps where `Exact` fires on about
    /// 39%, and any `lambda >= 1` fires on every step. Close to `Exact` only
    /// while `lambda` is small.
    Approx,
}

/// Flatten `datum` in logical order, rejecting non-finite values.
fn finite_values<S, D>(datum: &ArrayBase<S, D>) -> Result<Vec<f32>>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let mut values = Vec::with_capacity(datum.len());
    for (index, &value) in datum.iter().enumerate() {
        if !value.is_finite() {
            return Err(EncodeError::NonFinite { index, value });
        }
        values.push(value);
    }
    Ok(values)
}

/// Flatten `datum` in logical order, rejecting negative or non-finite values.
pub(crate) fn magnitudes<S, D>(datum: &ArrayBase<S, D>) -> Result<Vec<f32>>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let values = finite_values(datum)?;
    if let Some((index, &value)) = values.iter().enumerate().find(|&(_, &v)| v < 0.0) {
        return Err(EncodeError::NegativeInput { index, value });
    }
    Ok(values)
}

/// `(num_steps, ...shape)`.
fn spike_shape(num_steps: usize, shape: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(shape.len() + 1);
    out.push(num_steps);
    out.extend_from_slice(shape);
    out
}

/// Reshape a `(num_steps, n)` buffer back to `(num_steps, ...shape)`.
fn unflatten(spikes: Array2<u8>, shape: &[usize]) -> Result<SpikeTensor> {
    let num_steps = spikes.nrows();
    Ok(spikes.into_shape(IxDyn(&spike_shape(num_steps, shape)))?)
}

pub(crate) fn validate_sparsity(sparsity: f32) -> Result<f32> {
    if !(0.0..=1.0).contains(&sparsity) {
        return Err(EncodeError::InvalidSparsity(sparsity));
    }
    Ok(sparsity)
}

pub(crate) fn validate_max_prob(max_prob: f32) -> Result<f32> {
    if !(max_prob > 0.0 && max_prob <= 1.0) {
        return Err(EncodeError::InvalidMaxProb(max_prob));
    }
    Ok(max_prob)
}

/// How many of `n` elements fire under `sparsity`.
fn firing_count(n: usize, sparsity: f32) -> usize {
    (((1.0 - sparsity as f64) * n as f64).round() as usize).min(n)
}

/// Single-spike encoding.
///
/// The `round((1 - sparsity) * n)` largest elements spike once, at step 0.
/// Equal magnitudes are ranked by flat index (lower index first). An
/// all-zero input carries no magnitude to rank and produces no spikes.
pub fn single<S, D>(datum: &ArrayBase<S, D>, horizon: Horizon, sparsity: f32) -> Result<SpikeTensor>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let sparsity = validate_sparsity(sparsity)?;
    let values = magnitudes(datum)?;
    let n = values.len();
    let mut spikes = Array2::<u8>::zeros((horizon.num_steps(), n));

    if values.iter().any(|&v| v > 0.0) {
        let k = firing_count(n, sparsity);
        let mut order: Vec<usize> = (0..n).collect();
        // Stable sort keeps ascending index order within ties.
        order.sort_by(|&a, &b| values[b].total_cmp(&values[a]));
        for &i in order.iter().take(k) {
            spikes[[0, i]] = 1;
        }
    }

    unflatten(spikes, datum.shape())
}

/// Repeat encoding: the input frame, unmodified, on every step.
pub fn repeat<S, D>(datum: &ArrayBase<S, D>, horizon: Horizon) -> Result<ArrayD<f32>>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    finite_values(datum)?;
    let shape = spike_shape(horizon.num_steps(), datum.shape());
    let frame = datum.view().into_dyn().insert_axis(Axis(0));
    let tiled = frame
        .broadcast(IxDyn(&shape))
        .ok_or_else(|| ShapeError::from_kind(ErrorKind::IncompatibleShape))?;
    Ok(tiled.to_owned())
}

/// Per-element firing probability: magnitudes above 1 are normalized by the
/// maximum, then scaled by `max_prob`.
fn bernoulli_probs(values: &[f32], max_prob: f32) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0f32, f32::max);
    let scale = if max > 1.0 { 1.0 / max } else { 1.0 };
    values
        .iter()
        .map(|&v| ((v * scale * max_prob) as f64).clamp(0.0, max_prob as f64))
        .collect()
}

/// Bernoulli encoding: an independent draw per element per step.
pub fn bernoulli<S, D, R>(
    datum: &ArrayBase<S, D>,
    horizon: Horizon,
    max_prob: f32,
    rng: &mut R,
) -> Result<SpikeTensor>
where
    S: Data<Elem = f32>,
    D: Dimension,
    R: Rng + ?Sized,
{
    let max_prob = validate_max_prob(max_prob)?;
    let probs = bernoulli_probs(&magnitudes(datum)?, max_prob);
    let mut spikes = Array2::<u8>::zeros((horizon.num_steps(), probs.len()));

    for mut row in spikes.rows_mut() {
        for (cell, &p) in row.iter_mut().zip(&probs) {
            if rng.gen::<f64>() < p {
                *cell = 1;
            }
        }
    }

    unflatten(spikes, datum.shape())
}

/// Bernoulli encoding of a single frame: one draw per element, no time axis.
pub fn bernoulli_frame<S, D, R>(datum: &ArrayBase<S, D>, max_prob: f32, rng: &mut R) -> Result<SpikeTensor>
where
    S: Data<Elem = f32>,
    D: Dimension,
    R: Rng + ?Sized,
{
    let max_prob = validate_max_prob(max_prob)?;
    let probs = bernoulli_probs(&magnitudes(datum)?, max_prob);
    let flat: Vec<u8> = probs.iter().map(|&p| u8::from(rng.gen::<f64>() < p)).collect();
    Ok(ArrayD::from_shape_vec(IxDyn(datum.shape()), flat)?)
}

/// Poisson encoding. Magnitudes are rates in Hz, `horizon.dt()` is in ms.
pub fn poisson<S, D, R>(
    datum: &ArrayBase<S, D>,
    horizon: Horizon,
    mode: PoissonMode,
    rng: &mut R,
) -> Result<SpikeTensor>
where
    S: Data<Elem = f32>,
    D: Dimension,
    R: Rng + ?Sized,
{
    let rates = magnitudes(datum)?;
    let num_steps = horizon.num_steps();
    let mut spikes = Array2::<u8>::zeros((num_steps, rates.len()));

    for (i, &rate) in rates.iter().enumerate() {
        if rate == 0.0 {
            continue;
        }
        // Expected spikes per step.
        let lambda = rate as f64 * horizon.dt() / 1000.0;
        if lambda == 0.0 {
            continue;
        }
        let mut column = spikes.column_mut(i);
        if !lambda.is_finite() {
            column.fill(1);
            continue;
        }

        match mode {
            PoissonMode::Exact => {
                let Ok(isi) = Exp::new(lambda) else { continue };
                // A bin keeps one spike, and the process is memoryless, so
                // the next arrival is drawn from the start of the next bin.
                let mut t = isi.sample(rng);
                while t < num_steps as f64 {
                    let step = t as usize;
                    column[step] = 1;
                    t = (step + 1) as f64 + isi.sample(rng);
                }
            }
            PoissonMode::Approx => {
                let p = lambda.min(1.0);
                for cell in column.iter_mut() {
                    if rng.gen::<f64>() < p {
                        *cell = 1;
                    }
                }
            }
        }
    }

    unflatten(spikes, datum.shape())
}

/// Rank-order encoding.
///
/// Latency is linear in `max / x`: the largest magnitude spikes at step 0,
/// the smallest non-zero magnitude at the last step. Equal magnitudes share
/// a step. Zeros never spike.
pub fn rank_order<S, D>(datum: &ArrayBase<S, D>, horizon: Horizon) -> Result<SpikeTensor>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    let values = magnitudes(datum)?;
    let num_steps = horizon.num_steps();
    let mut spikes = Array2::<u8>::zeros((num_steps, values.len()));

    let max = values.iter().copied().fold(0.0f32, f32::max) as f64;
    if max > 0.0 {
        let min = values
            .iter()
            .filter(|&&v| v > 0.0)
            .fold(f64::INFINITY, |m, &v| m.min(v as f64));
        let span = max / min - 1.0;
        let last = (num_steps - 1) as f64;

        for (i, &v) in values.iter().enumerate() {
            if v <= 0.0 {
                continue;
            }
            let step = if span > 0.0 {
                let latency = max / v as f64 - 1.0;
                ((latency / span) * last).floor() as usize
            } else {
                0
            };
            spikes[[step.min(num_steps - 1), i]] = 1;
        }
    }

    unflatten(spikes, datum.shape())
}
