use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed numbers in `[0, 1)` used for every choice
/// the sampler makes.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Adapts any `rand` generator into a [`RandomSource`]
#[derive(Debug, Clone)]
pub struct RngSource<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource { rng }
    }
}

impl RngSource<StdRng> {
    /// A reproducible source
    pub fn seeded(seed: u64) -> Self {
        RngSource::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for RngSource<StdRng> {
    fn default() -> Self {
        RngSource::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }
}

/// The source used when the caller doesn't supply one
pub fn default_random() -> Box<dyn RandomSource> {
    Box::new(RngSource::default())
}

/// A source producing `values` in order, then repeating the last one.
///
/// An empty list always yields 0.
pub fn sequence_random(values: Vec<f64>) -> impl FnMut() -> f64 {
    let mut index = 0;
    move || {
        let value = values
            .get(index)
            .or_else(|| values.last())
            .copied()
            .unwrap_or(0.0);
        index += 1;
        value
    }
}
