use std::fmt;

use tracing::info;

use crate::cpu::CpuGateway;
use crate::error::{Error, Result};

/// Where the transform should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePreference {
    #[default]
    Gpu,
    Cpu,
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DevicePreference::Gpu => write!(f, "gpu"),
            DevicePreference::Cpu => write!(f, "cpu"),
        }
    }
}

/// A baked, size-specific FFT plan on some device.
///
/// Buffers in the frequency domain are complex-interleaved: `[re0, im0, re1, im1, …]`,
/// `2 * len()` floats holding all `len()` bins. Calls block until the device is done.
pub trait TransformGateway {
    /// Transform size N the plan was baked for.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short backend label for logs and reports.
    fn name(&self) -> &'static str;

    /// Forward transform of `len()` real samples into `2 * len()` interleaved floats.
    fn forward(&mut self, signal: &[f32]) -> Result<Vec<f32>>;

    /// Inverse transform of `2 * len()` interleaved floats, returning the `len()` real
    /// parts scaled by `1 / N`.
    fn backward(&mut self, spectrum: &[f32]) -> Result<Vec<f32>>;
}

impl<G: TransformGateway + ?Sized> TransformGateway for Box<G> {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn forward(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        (**self).forward(signal)
    }

    fn backward(&mut self, spectrum: &[f32]) -> Result<Vec<f32>> {
        (**self).backward(spectrum)
    }
}

/// Rejects sizes no backend can plan for.
pub fn check_size(n: usize) -> Result<()> {
    if n == 0 || !n.is_power_of_two() {
        return Err(Error::UnsupportedSize(n));
    }
    Ok(())
}

/// Checks a buffer against the length a plan expects.
pub fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Sets up a device and bakes a plan for size `n`.
///
/// # Errors
///
/// - [`Error::UnsupportedSize`] unless `n` is a non-zero power of two.
/// - [`Error::DeviceUnavailable`] when the GPU runtime cannot provide a device.
///
/// # Example
///
/// ```
/// use fft_roundtrip::gateway::{initialize, release, DevicePreference, TransformGateway};
///
/// let gateway = initialize(1024, DevicePreference::Cpu).unwrap();
/// assert_eq!(gateway.len(), 1024);
/// release(gateway);
/// ```
pub fn initialize(n: usize, device: DevicePreference) -> Result<Box<dyn TransformGateway>> {
    check_size(n)?;
    let gateway: Box<dyn TransformGateway> = match device {
        DevicePreference::Cpu => Box::new(CpuGateway::new(n)?),
        DevicePreference::Gpu => Box::new(crate::gpu::GpuGateway::<crate::Runtime>::new(
            &Default::default(),
            n,
        )?),
    };
    info!(n, %device, backend = gateway.name(), "transform plan baked");
    Ok(gateway)
}

/// Tears the plan down. Dropping the gateway does the same.
pub fn release(gateway: Box<dyn TransformGateway>) {
    info!(n = gateway.len(), backend = gateway.name(), "releasing transform plan");
    drop(gateway);
}
