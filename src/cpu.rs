use std::fmt;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use crate::error::Result;
use crate::gateway::{check_len, check_size, TransformGateway};

/// `rustfft` plans run on the host.
pub struct CpuGateway {
    n: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl fmt::Debug for CpuGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CpuGateway").field("n", &self.n).finish()
    }
}

impl CpuGateway {
    /// Plans forward and inverse transforms of size `n` once.
    pub fn new(n: usize) -> Result<Self> {
        check_size(n)?;
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            n,
            forward,
            inverse,
            buffer: vec![Complex32::new(0.0, 0.0); n],
            scratch: vec![Complex32::new(0.0, 0.0); scratch_len],
        })
    }
}

impl TransformGateway for CpuGateway {
    fn len(&self) -> usize {
        self.n
    }

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn forward(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        check_len(self.n, signal.len())?;
        for (slot, &x) in self.buffer.iter_mut().zip(signal) {
            *slot = Complex32::new(x, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        Ok(self.buffer.iter().flat_map(|c| [c.re, c.im]).collect())
    }

    fn backward(&mut self, spectrum: &[f32]) -> Result<Vec<f32>> {
        check_len(2 * self.n, spectrum.len())?;
        for (slot, pair) in self.buffer.iter_mut().zip(spectrum.chunks_exact(2)) {
            *slot = Complex32::new(pair[0], pair[1]);
        }
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let scale = (self.n as f32).recip();
        Ok(self.buffer.iter().map(|c| c.re * scale).collect())
    }
}
