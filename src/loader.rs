//! Lazy encoding over a dataset.
//!
//! `EncodingLoader` pairs an encoder and a random source with any iterator of
//! input tensors and yields one encoded tensor per datum. Nothing is encoded
//! until the item is pulled.

use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use rand::Rng;

use crate::encoder::Encoder;
use crate::error::Result;
use crate::transform::PoissonMode;

pub struct EncodingLoader<I, R> {
    encoder: Encoder,
    data: I,
    rng: R,
}

impl<I, R> EncodingLoader<I, R>
where
    I: Iterator,
{
    pub fn new<T>(encoder: Encoder, data: T, rng: R) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self { encoder, data: data.into_iter(), rng }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Give back the random source, e.g. to continue the same stream.
    pub fn into_rng(self) -> R {
        self.rng
    }
}

impl<I, S, D, R> Iterator for EncodingLoader<I, R>
where
    I: Iterator<Item = ArrayBase<S, D>>,
    S: Data<Elem = f32>,
    D: Dimension,
    R: Rng,
{
    type Item = Result<ArrayD<f32>>;

    fn next(&mut self) -> Option<Self::Item> {
        let datum = self.data.next()?;
        Some(self.encoder.encode(&datum, &mut self.rng))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.data.size_hint()
    }
}

/// Bernoulli-encode every datum of `data`.
pub fn bernoulli_loader<T, R>(
    data: T,
    time: f64,
    dt: f64,
    max_prob: f32,
    rng: R,
) -> Result<EncodingLoader<T::IntoIter, R>>
where
    T: IntoIterator,
{
    Ok(EncodingLoader::new(Encoder::bernoulli(time, dt, max_prob)?, data, rng))
}

/// Poisson-encode every datum of `data` (rates in Hz, `dt` in ms).
pub fn poisson_loader<T, R>(
    data: T,
    time: f64,
    dt: f64,
    mode: PoissonMode,
    rng: R,
) -> Result<EncodingLoader<T::IntoIter, R>>
where
    T: IntoIterator,
{
    Ok(EncodingLoader::new(Encoder::poisson(time, dt, mode)?, data, rng))
}

/// Rank-order-encode every datum of `data`. Deterministic; `rng` is unused
/// but keeps the loader type uniform.
pub fn rank_order_loader<T, R>(data: T, time: f64, dt: f64, rng: R) -> Result<EncodingLoader<T::IntoIter, R>>
where
    T: IntoIterator,
{
    Ok(EncodingLoader::new(Encoder::rank_order(time, dt)?, data, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EncodeError;
    use ndarray::{arr1, Array1};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dataset() -> Vec<Array1<f32>> {
        vec![arr1(&[0.0, 0.5, 1.0]), arr1(&[1.0, 1.0, 0.0]), arr1(&[0.25, 0.0, 0.75])]
    }

    #[test]
    fn yields_one_encoding_per_datum() {
        let loader = bernoulli_loader(dataset(), 16.0, 1.0, 1.0, StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(loader.size_hint(), (3, Some(3)));
        let encoded: Vec<_> = loader.collect::<Result<_>>().unwrap();
        assert_eq!(encoded.len(), 3);
        for spikes in &encoded {
            assert_eq!(spikes.shape(), &[16, 3]);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let a: Vec<_> = poisson_loader(dataset(), 50.0, 1.0, PoissonMode::Exact, StdRng::seed_from_u64(1))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let b: Vec<_> = poisson_loader(dataset(), 50.0, 1.0, PoissonMode::Exact, StdRng::seed_from_u64(1))
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn works_over_views() {
        let data = dataset();
        let loader = rank_order_loader(data.iter().map(|d| d.view()), 4.0, 1.0, StdRng::seed_from_u64(0)).unwrap();
        let encoded: Vec<_> = loader.collect::<Result<_>>().unwrap();
        assert_eq!(encoded[0][[0, 2]], 1.0);
        assert_eq!(encoded[0][[3, 1]], 1.0);
    }

    #[test]
    fn bad_datum_surfaces_as_item_error() {
        let data = vec![arr1(&[1.0f32]), arr1(&[-1.0f32])];
        let mut loader = rank_order_loader(data, 4.0, 1.0, StdRng::seed_from_u64(0)).unwrap();
        assert!(loader.next().unwrap().is_ok());
        assert!(matches!(loader.next().unwrap(), Err(EncodeError::NegativeInput { .. })));
        assert!(loader.next().is_none());
    }

    #[test]
    fn bad_parameters_fail_before_iteration() {
        let loader = bernoulli_loader(dataset(), 10.0, 1.0, 0.0, StdRng::seed_from_u64(0));
        assert!(matches!(loader, Err(EncodeError::InvalidMaxProb(_))));
    }
}
