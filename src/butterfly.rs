// Radix-2 DIT butterfly over a complex-interleaved buffer in global memory.
// One launch per stage; the host bit-reverses the input beforehand.
use cubecl::prelude::*;
use std::f32::consts::PI;

/// Single butterfly stage over `data = [re0, im0, re1, im1, …]` holding `n` complex values.
///
/// N/2 threads are launched; thread `tid` owns the disjoint pair `(i, j)`:
///
/// ```text
/// k    = tid % half_stride
/// i    = (tid / half_stride) * (2 * half_stride) + k
/// j    = i + half_stride
///
/// W    = exp(sign · jπ · k / half_stride)
///          sign = -1  →  forward FFT
///          sign = +1  →  inverse FFT
///
/// x[i] = x[i] + W · x[j]
/// x[j] = x[i] - W · x[j]
/// ```
#[cube(launch)]
pub fn butterfly_interleaved<F: Float>(
    data: &mut Array<F>,
    #[comptime] n: usize,
    #[comptime] half_stride: usize,
    #[comptime] forward: bool,
) {
    let tid = ABSOLUTE_POS;
    if tid < n / 2 {
        let k = tid % half_stride;
        let i = (tid / half_stride) * (half_stride * 2) + k;
        let j = i + half_stride;

        let sign = if forward { F::new(-1.0) } else { F::new(1.0) };
        let angle = sign * F::new(PI) * F::cast_from(k) / F::cast_from(half_stride);
        let cos_a = F::cos(angle);
        let sin_a = F::sin(angle);

        let ur = data[2 * i];
        let ui = data[2 * i + 1];
        let xr = data[2 * j];
        let xi = data[2 * j + 1];
        let vr = cos_a * xr - sin_a * xi;
        let vi = sin_a * xr + cos_a * xi;

        data[2 * i] = ur + vr;
        data[2 * i + 1] = ui + vi;
        data[2 * j] = ur - vr;
        data[2 * j + 1] = ui - vi;
    }
}

/// Reverses the lowest `bits` bits of `x`.
#[inline]
pub fn bit_reverse(mut x: usize, bits: u32) -> usize {
    let mut r = 0usize;
    for _ in 0..bits {
        r = (r << 1) | (x & 1);
        x >>= 1;
    }
    r
}
