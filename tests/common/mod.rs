//! Shared test helpers compiled into every integration-test binary.
//! Items may not all be used in every binary, so dead_code is suppressed.
#![allow(dead_code)]

use fft_roundtrip::gateway::{check_len, TransformGateway};
use fft_roundtrip::{Error, Result};

/// Maximum absolute error tolerated between f32 transform results and analytical values.
pub const EPSILON: f32 = 1e-3;

pub fn assert_approx(actual: f32, expected: f32, label: &str) {
    assert!(
        (actual - expected).abs() <= EPSILON,
        "{}: got {:.6}, expected {:.6}  (diff {:.2e})",
        label,
        actual,
        expected,
        (actual - expected).abs(),
    );
}

pub fn assert_slice_approx(actual: &[f32], expected: &[f32], label: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{}: length mismatch ({} vs {})",
        label,
        actual.len(),
        expected.len()
    );
    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() <= EPSILON,
            "{}[{}]: got {:.6}, expected {:.6}  (diff {:.2e})",
            label,
            i,
            a,
            e,
            (a - e).abs(),
        );
    }
}

/// Noiseless stand-in: "forward" packs samples as complex values with zero
/// imaginary part, "backward" unpacks the real parts untouched.
#[derive(Debug, Default)]
pub struct PassThroughGateway {
    pub n: usize,
    pub forward_calls: usize,
    pub backward_calls: usize,
}

impl PassThroughGateway {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            ..Default::default()
        }
    }
}

impl TransformGateway for PassThroughGateway {
    fn len(&self) -> usize {
        self.n
    }

    fn name(&self) -> &'static str {
        "pass-through"
    }

    fn forward(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        check_len(self.n, signal.len())?;
        self.forward_calls += 1;
        Ok(signal.iter().flat_map(|&x| [x, 0.0]).collect())
    }

    fn backward(&mut self, spectrum: &[f32]) -> Result<Vec<f32>> {
        check_len(2 * self.n, spectrum.len())?;
        self.backward_calls += 1;
        Ok(spectrum.iter().step_by(2).copied().collect())
    }
}

/// Reports a backend failure once `healthy_calls` transforms have succeeded.
#[derive(Debug)]
pub struct FailingGateway {
    pub inner: PassThroughGateway,
    pub healthy_calls: usize,
}

impl FailingGateway {
    pub fn new(n: usize, healthy_calls: usize) -> Self {
        Self {
            inner: PassThroughGateway::new(n),
            healthy_calls,
        }
    }

    fn tick(&mut self) -> Result<()> {
        if self.healthy_calls == 0 {
            return Err(Error::Backend("simulated device lost".to_string()));
        }
        self.healthy_calls -= 1;
        Ok(())
    }
}

impl TransformGateway for FailingGateway {
    fn len(&self) -> usize {
        self.inner.n
    }

    fn name(&self) -> &'static str {
        "failing"
    }

    fn forward(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        self.tick()?;
        self.inner.forward(signal)
    }

    fn backward(&mut self, spectrum: &[f32]) -> Result<Vec<f32>> {
        self.tick()?;
        self.inner.backward(spectrum)
    }
}

/// Splits an interleaved buffer into (real, imag).
pub fn split(interleaved: &[f32]) -> (Vec<f32>, Vec<f32>) {
    let real = interleaved.iter().step_by(2).copied().collect();
    let imag = interleaved.iter().skip(1).step_by(2).copied().collect();
    (real, imag)
}
