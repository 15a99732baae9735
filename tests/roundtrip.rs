use std::f32::consts::PI;

use fft_roundtrip::cpu::CpuGateway;
use fft_roundtrip::gateway::{initialize, DevicePreference, TransformGateway};
use fft_roundtrip::metric::signal_to_quantization_error;
use fft_roundtrip::signal::{generate, GenerationConfig};
use fft_roundtrip::Error;

mod common;
use common::{assert_approx, assert_slice_approx, split};

/// backward(forward(x)) must recover periodic signals of several sizes.
#[test]
fn test_roundtrip_periodic_sizes() {
    for n in [8usize, 64, 8192] {
        let mut gateway = CpuGateway::new(n).unwrap();
        let signal = generate(n, &GenerationConfig::Periodic).unwrap();

        let raw = gateway.forward(&signal).unwrap();
        assert_eq!(raw.len(), 2 * n);
        let reconstruction = gateway.backward(&raw).unwrap();

        assert_slice_approx(&reconstruction, &signal, &format!("round-trip n={n}"));
        let sqer = signal_to_quantization_error(&signal, &reconstruction);
        assert!(sqer > 80.0, "n = {n}: SQER {sqer} dB");
    }
}

#[test]
fn test_roundtrip_random_signal() {
    let n = 1024;
    let mut gateway = CpuGateway::new(n).unwrap();
    let signal = generate(n, &GenerationConfig::random(0.5, 0.2).with_seed(3)).unwrap();

    let raw = gateway.forward(&signal).unwrap();
    let reconstruction = gateway.backward(&raw).unwrap();

    assert_slice_approx(&reconstruction, &signal, "random round-trip");
}

/// FFT of an impulse [1, 0, 0, …] is all-ones real and all-zeros imaginary.
#[test]
fn test_forward_impulse() {
    let n = 8;
    let mut input = vec![0.0f32; n];
    input[0] = 1.0;

    let (real, imag) = split(&CpuGateway::new(n).unwrap().forward(&input).unwrap());

    assert_slice_approx(&real, &[1.0; 8], "real");
    assert_slice_approx(&imag, &[0.0; 8], "imag");
}

/// FFT of a constant signal is [N, 0, 0, …].
#[test]
fn test_forward_dc_signal() {
    let n = 8;
    let (real, imag) = split(&CpuGateway::new(n).unwrap().forward(&[1.0; 8]).unwrap());

    assert_approx(real[0], n as f32, "real[0]");
    for k in 1..n {
        assert_approx(real[k], 0.0, &format!("real[{k}]"));
    }
    assert_slice_approx(&imag, &[0.0; 8], "imag");
}

/// sin(2πn/N) puts -jN/2 in bin 1 and +jN/2 in bin N-1.
#[test]
fn test_forward_single_frequency_sine() {
    let n = 8usize;
    let half_n = n as f32 / 2.0;
    let input: Vec<f32> = (0..n)
        .map(|i| (2.0 * PI * i as f32 / n as f32).sin())
        .collect();

    let (real, imag) = split(&CpuGateway::new(n).unwrap().forward(&input).unwrap());

    assert_slice_approx(&real, &[0.0; 8], "real");
    assert_approx(imag[1], -half_n, "imag[1]");
    assert_approx(imag[n - 1], half_n, "imag[n-1]");
    for k in 2..n - 1 {
        assert_approx(imag[k], 0.0, &format!("imag[{k}]"));
    }
}

/// IFFT of a flat spectrum is an impulse.
#[test]
fn test_backward_flat_spectrum() {
    let n = 8;
    let raw: Vec<f32> = (0..n).flat_map(|_| [1.0f32, 0.0]).collect();
    let output = CpuGateway::new(n).unwrap().backward(&raw).unwrap();

    let mut expected = vec![0.0f32; n];
    expected[0] = 1.0;
    assert_slice_approx(&output, &expected, "impulse");
}

#[test]
fn test_initialize_rejects_unsupported_sizes() {
    for n in [0usize, 3, 1000] {
        assert!(matches!(
            initialize(n, DevicePreference::Cpu),
            Err(Error::UnsupportedSize(m)) if m == n
        ));
    }
}

#[test]
fn test_initialize_cpu() {
    let mut gateway = initialize(64, DevicePreference::Cpu).unwrap();
    assert_eq!(gateway.len(), 64);
    assert_eq!(gateway.name(), "cpu");
    assert_eq!(gateway.forward(&[0.0; 64]).unwrap(), vec![0.0; 128]);
}

#[test]
fn test_buffer_length_is_checked() {
    let mut gateway = CpuGateway::new(16).unwrap();
    assert!(matches!(
        gateway.forward(&[0.0; 8]),
        Err(Error::LengthMismatch { expected: 16, actual: 8 })
    ));
    assert!(matches!(
        gateway.backward(&[0.0; 16]),
        Err(Error::LengthMismatch { expected: 32, actual: 16 })
    ));
}
