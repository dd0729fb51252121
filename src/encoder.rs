//! Encoder wrapper: one transform bound to its parameters.
//!
//! Parameters are validated once, when the encoder is built. After that an
//! `Encoder` is plain configuration, so it can be cloned, shared across
//! threads, and reused for any number of inputs.

use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::preprocess;
use crate::timing::Horizon;
use crate::transform::{self, PoissonMode, SpikeTensor};

/// Which transform an encoder applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncoderKind {
    Null,
    Single,
    Repeat,
    Bernoulli,
    Poisson,
    RankOrder,
}

impl EncoderKind {
    /// Whether encoding draws from the random source.
    pub fn is_stochastic(self) -> bool {
        matches!(self, Self::Bernoulli | Self::Poisson)
    }
}

impl std::fmt::Display for EncoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Single => "single",
            Self::Repeat => "repeat",
            Self::Bernoulli => "bernoulli",
            Self::Poisson => "poisson",
            Self::RankOrder => "rank_order",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleParams {
    pub horizon: Horizon,
    /// Fraction of elements that stay silent.
    pub sparsity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepeatParams {
    pub horizon: Horizon,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BernoulliParams {
    pub horizon: Horizon,
    /// Upper bound on the per-step firing probability.
    pub max_prob: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoissonParams {
    pub horizon: Horizon,
    pub mode: PoissonMode,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankOrderParams {
    pub horizon: Horizon,
}

/// A spike encoder with its parameters bound.
///
/// All variants except `Null` produce a tensor shaped
/// `(num_steps, ...input_shape)`. Binary policies emit exactly `0.0` or
/// `1.0`; `Repeat` mirrors the input on every step.
///
/// `Null` returns its input unchanged. It is not a spike encoder; it only
/// fills the slot where encoding is optional.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Encoder {
    #[default]
    Null,
    Single(SingleParams),
    Repeat(RepeatParams),
    Bernoulli(BernoulliParams),
    Poisson(PoissonParams),
    RankOrder(RankOrderParams),
}

impl Encoder {
    /// Single-spike encoder. `sparsity` is the fraction of silent elements.
    pub fn single(time: f64, dt: f64, sparsity: f32) -> Result<Self> {
        let horizon = Horizon::new(time, dt)?;
        let sparsity = transform::validate_sparsity(sparsity)?;
        Ok(Self::Single(SingleParams { horizon, sparsity }).built())
    }

    pub fn repeat(time: f64, dt: f64) -> Result<Self> {
        let horizon = Horizon::new(time, dt)?;
        Ok(Self::Repeat(RepeatParams { horizon }).built())
    }

    /// Bernoulli encoder; `max_prob` must lie in `(0, 1]`.
    pub fn bernoulli(time: f64, dt: f64, max_prob: f32) -> Result<Self> {
        let horizon = Horizon::new(time, dt)?;
        let max_prob = transform::validate_max_prob(max_prob)?;
        Ok(Self::Bernoulli(BernoulliParams { horizon, max_prob }).built())
    }

    /// Poisson encoder. Inputs are rates in Hz; `dt` is in milliseconds.
    pub fn poisson(time: f64, dt: f64, mode: PoissonMode) -> Result<Self> {
        let horizon = Horizon::new(time, dt)?;
        Ok(Self::Poisson(PoissonParams { horizon, mode }).built())
    }

    pub fn rank_order(time: f64, dt: f64) -> Result<Self> {
        let horizon = Horizon::new(time, dt)?;
        Ok(Self::RankOrder(RankOrderParams { horizon }).built())
    }

    fn built(self) -> Self {
        if let Some(h) = self.horizon() {
            log::debug!(
                "[ENCODER] {}: {} steps (time={}, dt={})",
                self.kind(), h.num_steps(), h.time(), h.dt()
            );
        }
        self
    }

    pub fn kind(&self) -> EncoderKind {
        match self {
            Self::Null => EncoderKind::Null,
            Self::Single(_) => EncoderKind::Single,
            Self::Repeat(_) => EncoderKind::Repeat,
            Self::Bernoulli(_) => EncoderKind::Bernoulli,
            Self::Poisson(_) => EncoderKind::Poisson,
            Self::RankOrder(_) => EncoderKind::RankOrder,
        }
    }

    /// Bound horizon; `None` for `Null`.
    pub fn horizon(&self) -> Option<Horizon> {
        match self {
            Self::Null => None,
            Self::Single(p) => Some(p.horizon),
            Self::Repeat(p) => Some(p.horizon),
            Self::Bernoulli(p) => Some(p.horizon),
            Self::Poisson(p) => Some(p.horizon),
            Self::RankOrder(p) => Some(p.horizon),
        }
    }

    /// Length of the time axis of every output; `None` for `Null`.
    pub fn num_steps(&self) -> Option<usize> {
        self.horizon().map(|h| h.num_steps())
    }

    /// Encode `datum`, drawing randomness (Bernoulli, Poisson) from `rng`.
    ///
    /// Input errors are reported before any output is allocated.
    pub fn encode<S, D, R>(&self, datum: &ArrayBase<S, D>, rng: &mut R) -> Result<ArrayD<f32>>
    where
        S: Data<Elem = f32>,
        D: Dimension,
        R: Rng + ?Sized,
    {
        log::trace!("[ENCODE] {}: input shape {:?}", self.kind(), datum.shape());
        match self {
            Self::Null => Ok(datum.view().into_dyn().to_owned()),
            Self::Single(p) => transform::single(datum, p.horizon, p.sparsity).map(to_float),
            Self::Repeat(p) => transform::repeat(datum, p.horizon),
            Self::Bernoulli(p) => transform::bernoulli(datum, p.horizon, p.max_prob, rng).map(to_float),
            Self::Poisson(p) => transform::poisson(datum, p.horizon, p.mode, rng).map(to_float),
            Self::RankOrder(p) => transform::rank_order(datum, p.horizon).map(to_float),
        }
    }

    /// Encode with a fresh `StdRng` seeded from `seed`.
    ///
    /// Same seed + same input = same spike train.
    pub fn encode_seeded<S, D>(&self, datum: &ArrayBase<S, D>, seed: u64) -> Result<ArrayD<f32>>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        self.encode(datum, &mut StdRng::seed_from_u64(seed))
    }
}

fn to_float(spikes: SpikeTensor) -> ArrayD<f32> {
    spikes.mapv(f32::from)
}

/// Runs sign splitting ahead of an encoder so signed data can feed encoders
/// that only accept non-negative magnitudes.
///
/// The output gains the split axis at `axis + 1` (after the time axis).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositiveEncoder {
    encoder: Encoder,
    axis: usize,
}

impl PositiveEncoder {
    /// `axis` is where the positive/negative pair is inserted in the input
    /// (`0..=input.ndim()`).
    pub fn new(encoder: Encoder, axis: usize) -> Self {
        Self { encoder, axis }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    pub fn encode<S, D, R>(&self, datum: &ArrayBase<S, D>, rng: &mut R) -> Result<ArrayD<f32>>
    where
        S: Data<Elem = f32>,
        D: Dimension,
        R: Rng + ?Sized,
    {
        let split = preprocess::to_positive(datum, self.axis)?;
        self.encoder.encode(&split, rng)
    }

    pub fn encode_seeded<S, D>(&self, datum: &ArrayBase<S, D>, seed: u64) -> Result<ArrayD<f32>>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        self.encode(datum, &mut StdRng::seed_from_u64(seed))
    }
}
