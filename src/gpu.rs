use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use cubecl::prelude::*;
use tracing::debug;

use crate::butterfly::{bit_reverse, butterfly_interleaved};
use crate::error::{Error, Result};
use crate::gateway::{check_len, check_size, TransformGateway};
use crate::WORKGROUP_SIZE;

/// Precomputed launch layout for one transform size.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Plan {
    n: usize,
    /// `permutation[i]` is where natural-order bin `i` lands before the first stage.
    permutation: Vec<usize>,
    /// Half-stride of every butterfly stage, innermost first.
    stages: Vec<usize>,
    workgroups: u32,
}

impl Plan {
    fn bake(n: usize) -> Self {
        let bits = n.ilog2();
        Plan {
            n,
            permutation: (0..n).map(|i| bit_reverse(i, bits)).collect(),
            stages: (0..bits).map(|s| 1_usize << s).collect(),
            workgroups: ((n / 2) as u32).div_ceil(WORKGROUP_SIZE),
        }
    }

    /// Bit-reverses complex pairs of an interleaved buffer.
    fn permute(&self, interleaved: &[f32]) -> Vec<f32> {
        let mut out = vec![0.0f32; 2 * self.n];
        for (i, &j) in self.permutation.iter().enumerate() {
            out[2 * j] = interleaved[2 * i];
            out[2 * j + 1] = interleaved[2 * i + 1];
        }
        out
    }
}

/// Radix-2 FFT plan on a CubeCL device.
///
/// Every call uploads one interleaved buffer, runs `log2(N)` butterfly launches in
/// place and reads the buffer back, so host and device never overlap.
pub struct GpuGateway<R: Runtime> {
    device: R::Device,
    plan: Plan,
}

impl<R: Runtime> fmt::Debug for GpuGateway<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpuGateway")
            .field("n", &self.plan.n)
            .field("stages", &self.plan.stages.len())
            .finish()
    }
}

impl<R: Runtime> GpuGateway<R> {
    /// Acquires a client for `device` and bakes the plan for size `n`.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnavailable`] if the runtime finds no adapter; CubeCL reports
    /// that by panicking, which is caught here.
    pub fn new(device: &R::Device, n: usize) -> Result<Self> {
        check_size(n)?;
        panic::catch_unwind(AssertUnwindSafe(|| {
            let _client = R::client(device);
        }))
        .map_err(|payload| Error::DeviceUnavailable(panic_message(payload.as_ref())))?;

        let plan = Plan::bake(n);
        debug!(n, stages = plan.stages.len(), workgroups = plan.workgroups, "gpu plan baked");
        Ok(Self {
            device: device.clone(),
            plan,
        })
    }

    fn transform(&self, interleaved: &[f32], forward: bool) -> Result<Vec<f32>> {
        let n = self.plan.n;
        let data = self.plan.permute(interleaved);

        let client = R::client(&self.device);
        let handle = client.create_from_slice(f32::as_bytes(&data));

        for &half_stride in &self.plan.stages {
            unsafe {
                butterfly_interleaved::launch::<f32, R>(
                    &client,
                    CubeCount::Static(self.plan.workgroups, 1, 1),
                    CubeDim::new_1d(WORKGROUP_SIZE),
                    ArrayArg::from_raw_parts::<f32>(&handle, 2 * n, 1),
                    n,           // comptime
                    half_stride, // comptime, one kernel per stage
                    forward,     // comptime
                )
                .map_err(|err| {
                    Error::Backend(format!("butterfly launch (half_stride {half_stride}): {err:?}"))
                })?
            };
        }

        Ok(f32::from_bytes(&client.read_one(handle)).to_vec())
    }
}

impl<R: Runtime> TransformGateway for GpuGateway<R> {
    fn len(&self) -> usize {
        self.plan.n
    }

    fn name(&self) -> &'static str {
        "gpu"
    }

    fn forward(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        check_len(self.plan.n, signal.len())?;
        let interleaved: Vec<f32> = signal.iter().flat_map(|&x| [x, 0.0]).collect();
        self.transform(&interleaved, true)
    }

    fn backward(&mut self, spectrum: &[f32]) -> Result<Vec<f32>> {
        check_len(2 * self.plan.n, spectrum.len())?;
        let out = self.transform(spectrum, false)?;

        // 1/N scaling on the host; only the real parts are kept.
        let scale = (self.plan.n as f32).recip();
        Ok(out.iter().step_by(2).map(|&re| re * scale).collect())
    }
}

impl<R: Runtime> Drop for GpuGateway<R> {
    fn drop(&mut self) {
        debug!(n = self.plan.n, "gpu plan released");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "runtime initialisation panicked".to_string())
}
