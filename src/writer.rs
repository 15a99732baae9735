//! Plain-text result files.
//!
//! Both formats are newline-separated and overwrite whatever was at the path.
//! A failure midway leaves a truncated file behind; nothing is retried.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Name of the generated input signal file.
pub const DATA_FILE: &str = "fft-data.txt";
/// Name of the forward spectrum file.
pub const FORWARD_FILE: &str = "fft-forward.txt";
/// Name of the reconstructed signal file.
pub const BACKWARD_FILE: &str = "fft-backward.txt";

/// One amplitude/phase pair of a written spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub amplitude: f32,
    pub phase: f32,
}

impl Bin {
    pub fn from_parts(real: f32, imag: f32) -> Self {
        Bin {
            amplitude: real.hypot(imag),
            phase: imag.atan2(real),
        }
    }
}

/// Spectrum as it appears in `fft-forward.txt`.
pub type Spectrum = Vec<Bin>;

/// Extracts amplitude/phase pairs from a raw interleaved `[re, im, re, im, …]` buffer.
///
/// The walk starts at offset 1 and advances by 2 up to `raw.len() / 2`, pairing
/// `raw[i]` with `raw[i + 1]`. For a buffer of `2N` floats this yields `N / 2` bins.
///
/// # Example
///
/// ```
/// # use fft_roundtrip::writer::spectrum;
/// let mut raw = vec![0.0f32; 16];
/// raw[2] = 1.0;
/// let bins = spectrum(&raw);
/// assert_eq!(bins.len(), 4);
/// assert_eq!(bins[0].amplitude, 1.0);
/// ```
#[must_use]
pub fn spectrum(raw: &[f32]) -> Spectrum {
    (1..raw.len() / 2)
        .step_by(2)
        .map(|i| Bin::from_parts(raw[i], raw[i + 1]))
        .collect()
}

/// Writes one sample per line with six decimals.
pub fn write_samples_to<W: Write>(mut out: W, samples: &[f32]) -> io::Result<()> {
    for sample in samples {
        writeln!(out, "{sample:.6}")?;
    }
    out.flush()
}

/// Writes `"amplitude, phase"` lines for the bins [`spectrum`] extracts from `raw`.
pub fn write_spectrum_to<W: Write>(mut out: W, raw: &[f32]) -> io::Result<()> {
    for bin in spectrum(raw) {
        writeln!(out, "{:.6}, {:.6}", bin.amplitude, bin.phase)?;
    }
    out.flush()
}

/// Writes `samples` to `path`, replacing any existing file.
pub fn write_samples(path: impl AsRef<Path>, samples: &[f32]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), samples = samples.len(), "writing samples");
    File::create(path)
        .and_then(|file| write_samples_to(BufWriter::new(file), samples))
        .map_err(|source| io_error(path, source))
}

/// Writes the strided amplitude/phase spectrum of `raw` to `path`, replacing any existing file.
pub fn write_spectrum(path: impl AsRef<Path>, raw: &[f32]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), raw = raw.len(), "writing spectrum");
    File::create(path)
        .and_then(|file| write_spectrum_to(BufWriter::new(file), raw))
        .map_err(|source| io_error(path, source))
}

fn io_error(path: &Path, source: io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source,
    }
}
