//! # spikecode
//!
//! Spike-train encoders for spiking neural network simulators.
//!
//! Converts tensors of magnitudes (pixel intensities, firing rates, ...) into
//! spike tensors shaped `(num_steps, ...input_shape)` using one of five
//! policies: single spike, repeat, Bernoulli, Poisson, or rank order. Signed
//! inputs can be split into non-negative halves first with
//! [`preprocess::to_positive`] or [`PositiveEncoder`].
//!
//! Every transform is a pure function of its input, its parameters, and (for
//! Bernoulli and Poisson) a caller-supplied random source.

pub mod config;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod preprocess;
pub mod timing;
pub mod transform;

pub use config::EncoderConfig;
pub use encoder::{
    BernoulliParams, Encoder, EncoderKind, PoissonParams, PositiveEncoder, RankOrderParams, RepeatParams,
    SingleParams,
};
pub use error::{EncodeError, Result};
pub use loader::{bernoulli_loader, poisson_loader, rank_order_loader, EncodingLoader};
pub use preprocess::{from_positive, to_positive};
pub use timing::Horizon;
pub use transform::{PoissonMode, SpikeTensor};
