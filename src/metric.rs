/// Sum of squared samples, accumulated in `f64`.
///
/// # Example
///
/// ```
/// # use fft_roundtrip::metric::energy;
/// assert_eq!(energy(&[3.0f32, 4.0]), 25.0);
/// assert_eq!(energy(&[0.0f32; 16]), 0.0);
/// ```
#[must_use]
pub fn energy(signal: &[f32]) -> f64 {
    signal.iter().map(|&x| f64::from(x) * f64::from(x)).sum()
}

/// Sum of squared element-wise differences between `a` and `b`.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn error_energy(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len(), "error_energy: signals must have the same length");
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum()
}

/// Signal-to-quantization-error ratio of `reconstructed` against `original`, in dB.
///
/// `10 · log10(energy(original) / error_energy(original, reconstructed))`.
///
/// A perfect reconstruction has zero error energy and yields `f64::INFINITY`,
/// including the degenerate case of two all-zero signals.
///
/// # Panics
///
/// Panics if the slices have different lengths.
///
/// # Example
///
/// ```
/// # use fft_roundtrip::metric::signal_to_quantization_error;
/// let s = [1.0f32, -2.0, 3.0];
/// assert_eq!(signal_to_quantization_error(&s, &s), f64::INFINITY);
///
/// // Error energy is 1% of the signal energy → 20 dB.
/// let sqer = signal_to_quantization_error(&[10.0f32], &[9.0]);
/// assert!((sqer - 20.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn signal_to_quantization_error(original: &[f32], reconstructed: &[f32]) -> f64 {
    measure(original, reconstructed).sqer_db
}

/// Energies and SQER of one reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    pub signal_energy: f64,
    pub error_energy: f64,
    pub sqer_db: f64,
}

impl QualityReport {
    /// True when the reconstruction matched the original bit for bit.
    pub fn is_exact(&self) -> bool {
        self.error_energy == 0.0
    }
}

/// Computes [`energy`], [`error_energy`] and the resulting SQER together.
///
/// # Panics
///
/// Panics if the slices have different lengths.
#[must_use]
pub fn measure(original: &[f32], reconstructed: &[f32]) -> QualityReport {
    let signal_energy = energy(original);
    let error_energy = error_energy(original, reconstructed);
    let sqer_db = if error_energy == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (signal_energy / error_energy).log10()
    };
    QualityReport {
        signal_energy,
        error_energy,
        sqer_db,
    }
}
