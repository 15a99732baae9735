use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::{Error, Result};

/// Time step between consecutive periodic samples, in seconds.
pub const PERIODIC_TIME_STEP: f64 = 0.002;

/// An ordered sequence of real-valued samples.
pub type Signal = Vec<f32>;

/// Selects how [`generate`] synthesises a signal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GenerationConfig {
    /// Sum of three tones: `sin(πt) + sin(2πt) + sin(3πt)` with `t = i * 0.002`.
    #[default]
    Periodic,
    /// Independent draws from `Normal(mean, std)`.
    ///
    /// Without a `seed` the generator is reseeded from OS entropy on every call.
    Random {
        mean: f64,
        std: f64,
        seed: Option<u64>,
    },
}

impl GenerationConfig {
    /// Entropy-seeded Gaussian noise.
    pub fn random(mean: f64, std: f64) -> Self {
        GenerationConfig::Random {
            mean,
            std,
            seed: None,
        }
    }

    /// Pins the random generator to `seed`. No effect on periodic signals.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        match self {
            GenerationConfig::Random { mean, std, .. } => GenerationConfig::Random {
                mean,
                std,
                seed: Some(seed),
            },
            periodic => periodic,
        }
    }
}

/// Synthesises `n` samples according to `config`.
///
/// A zero-length request returns an empty signal.
///
/// # Errors
///
/// [`Error::InvalidGeneration`] when the random mode gets a non-finite mean or a
/// negative / non-finite standard deviation.
///
/// # Example
///
/// ```
/// use fft_roundtrip::signal::{generate, GenerationConfig};
///
/// let signal = generate(8, &GenerationConfig::Periodic).unwrap();
/// assert_eq!(signal.len(), 8);
/// assert_eq!(signal[0], 0.0);
/// ```
pub fn generate(n: usize, config: &GenerationConfig) -> Result<Signal> {
    match *config {
        GenerationConfig::Periodic => Ok(periodic(n)),
        GenerationConfig::Random { mean, std, seed } => random(n, mean, std, seed),
    }
}

fn periodic(n: usize) -> Signal {
    (0..n)
        .map(|i| {
            let t = i as f64 * PERIODIC_TIME_STEP;
            ((PI * t).sin() + (2.0 * PI * t).sin() + (3.0 * PI * t).sin()) as f32
        })
        .collect()
}

fn random(n: usize, mean: f64, std: f64, seed: Option<u64>) -> Result<Signal> {
    if !mean.is_finite() {
        return Err(Error::InvalidGeneration(format!("mean must be finite, got {mean}")));
    }
    if !std.is_finite() {
        return Err(Error::InvalidGeneration(format!("std must be finite, got {std}")));
    }
    let normal = Normal::new(mean, std)
        .map_err(|err| Error::InvalidGeneration(format!("std {std}: {err}")))?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!(n, mean, std, ?seed, "drawing gaussian samples");

    Ok((0..n).map(|_| normal.sample(&mut rng) as f32).collect())
}
