use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::ConfigErrors;
use crate::gateway::DevicePreference;
use crate::signal::GenerationConfig;
use crate::writer::{BACKWARD_FILE, DATA_FILE, FORWARD_FILE};

/// Transform size used when none is given.
pub const DEFAULT_SIZE: usize = 8192;
/// Forward passes timed when none is given.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Where the three result files of an accuracy run go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub data: PathBuf,
    pub forward: PathBuf,
    pub backward: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        OutputPaths {
            data: dir.join(DATA_FILE),
            forward: dir.join(FORWARD_FILE),
            backward: dir.join(BACKWARD_FILE),
        }
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        OutputPaths::in_dir(".")
    }
}

/// Validated parameters of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Transform size N; every signal has exactly this many samples.
    pub size: usize,
    pub device: DevicePreference,
    pub generation: GenerationConfig,
    /// Run the timing workflow instead of the accuracy one.
    pub timing: bool,
    pub iterations: usize,
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            size: DEFAULT_SIZE,
            device: DevicePreference::default(),
            generation: GenerationConfig::default(),
            timing: false,
            iterations: DEFAULT_ITERATIONS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::in_dir(self.output_dir.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Three-tone mix sin(πt) + sin(2πt) + sin(3πt)
    Periodic,
    /// Gaussian noise with --mean and --std
    Random,
}

/// Generates a signal, runs it through a forward/inverse FFT and reports the
/// signal-to-quantization-error ratio, or times repeated forward transforms.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run on the host (rustfft) instead of the GPU
    #[arg(long)]
    pub cpu: bool,

    /// Transform size; must be a power of two
    #[arg(short = 'n', long, default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Signal generation mode
    #[arg(short, long, value_enum, default_value_t = Mode::Periodic)]
    pub mode: Mode,

    /// Mean of the random signal
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub mean: f64,

    /// Standard deviation of the random signal
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub std: f64,

    /// Seed for the random signal; entropy-seeded when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Time repeated forward transforms instead of measuring accuracy
    #[arg(short, long)]
    pub timing: bool,

    /// Forward transforms per timing run
    #[arg(short, long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Directory receiving fft-data.txt, fft-forward.txt and fft-backward.txt
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Cli {
    /// Checks every option at once and returns either a runnable configuration
    /// or all problems found.
    pub fn validate(self) -> Result<RunConfig, ConfigErrors> {
        let mut errors = ConfigErrors::default();

        if self.size == 0 || !self.size.is_power_of_two() {
            errors.push(format!("size {} is not a non-zero power of two", self.size));
        }
        if self.iterations == 0 {
            errors.push("iterations must be at least 1");
        }

        let generation = match self.mode {
            Mode::Periodic => GenerationConfig::Periodic,
            Mode::Random => {
                if !self.mean.is_finite() {
                    errors.push(format!("mean {} is not finite", self.mean));
                }
                if !self.std.is_finite() || self.std < 0.0 {
                    errors.push(format!("std {} must be finite and non-negative", self.std));
                }
                GenerationConfig::Random {
                    mean: self.mean,
                    std: self.std,
                    seed: self.seed,
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RunConfig {
            size: self.size,
            device: if self.cpu {
                DevicePreference::Cpu
            } else {
                DevicePreference::Gpu
            },
            generation,
            timing: self.timing,
            iterations: self.iterations,
            output_dir: self.output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fft-roundtrip").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_validate() {
        let config = parse(&[]).validate().unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn random_mode_carries_parameters() {
        let config = parse(&["--mode", "random", "--mean", "0.5", "--std", "0.2", "--seed", "7"])
            .validate()
            .unwrap();
        assert_eq!(
            config.generation,
            GenerationConfig::Random {
                mean: 0.5,
                std: 0.2,
                seed: Some(7)
            }
        );
    }

    #[test]
    fn cpu_and_timing_flags() {
        let config = parse(&["--cpu", "--timing", "-i", "5", "-n", "1024"])
            .validate()
            .unwrap();
        assert_eq!(config.device, DevicePreference::Cpu);
        assert!(config.timing);
        assert_eq!(config.iterations, 5);
        assert_eq!(config.size, 1024);
    }

    #[test]
    fn collects_every_problem() {
        let errors = parse(&["-n", "1000", "-i", "0", "--mode", "random", "--std", "-1"])
            .validate()
            .unwrap_err();
        assert_eq!(errors.len(), 3, "{errors}");
    }

    #[test]
    fn std_is_ignored_in_periodic_mode() {
        assert!(parse(&["--std", "-1"]).validate().is_ok());
    }

    #[test]
    fn malformed_values_fail_to_parse() {
        let args = ["fft-roundtrip", "--size", "lots"];
        assert!(Cli::try_parse_from(args).is_err());
        let args = ["fft-roundtrip", "--mode", "sawtooth"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn output_paths_use_reference_names() {
        let paths = OutputPaths::in_dir("/tmp/run");
        assert_eq!(paths.data, PathBuf::from("/tmp/run/fft-data.txt"));
        assert_eq!(paths.forward, PathBuf::from("/tmp/run/fft-forward.txt"));
        assert_eq!(paths.backward, PathBuf::from("/tmp/run/fft-backward.txt"));
    }
}
