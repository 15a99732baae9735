//! Signal generation, FFT round trips and signal-to-quantization-error measurement.
//!
//! A run generates a [`Signal`](signal::Signal), pushes it through a
//! [`TransformGateway`](gateway::TransformGateway) (GPU via CubeCL, or CPU via
//! `rustfft`), writes the spectrum and reconstruction as text and reports how
//! faithfully the inverse transform recovered the input.
//!
//! ```no_run
//! use fft_roundtrip::config::RunConfig;
//! use fft_roundtrip::gateway::{initialize, DevicePreference};
//! use fft_roundtrip::orchestrator::Orchestrator;
//!
//! let config = RunConfig { size: 1024, device: DevicePreference::Cpu, ..Default::default() };
//! let gateway = initialize(config.size, config.device).unwrap();
//! let mut orchestrator = Orchestrator::new(config, gateway).unwrap();
//! let report = orchestrator.accuracy_run().unwrap();
//! println!("{report}");
//! ```

pub mod butterfly;
pub mod config;
pub mod cpu;
pub mod error;
pub mod gateway;
pub mod gpu;
pub mod metric;
pub mod orchestrator;
pub mod signal;
pub mod writer;

pub use error::{Error, Result};

// The general advice for WebGPU is to choose a workgroup size of 64
// Common sizes are 32, 64, 128, 256, or 512 threads per workgroup.
// Apple Metal supports a maximum workgroup size of 1024 threads.
pub(crate) const WORKGROUP_SIZE: u32 = 1024;

#[cfg(feature = "wgpu")]
pub type Runtime = cubecl::wgpu::WgpuRuntime;

#[cfg(all(feature = "cuda", not(feature = "wgpu")))]
pub type Runtime = cubecl::cuda::CudaRuntime;
