use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace};

use crate::config::{OutputPaths, RunConfig};
use crate::error::{Error, Result};
use crate::gateway::{check_len, TransformGateway};
use crate::metric::{self, QualityReport};
use crate::signal;
use crate::writer;

/// Lifecycle of an [`Orchestrator`].
///
/// ```text
/// Uninitialized → Configured → Running → Completed
///                                 └────→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Uninitialized,
    Configured,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Uninitialized => "uninitialized",
            RunState::Configured => "configured",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of [`Orchestrator::accuracy_run`].
#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyReport {
    pub quality: QualityReport,
    /// Lines written to the spectrum file.
    pub bins: usize,
    pub paths: OutputPaths,
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "signal energy : {:.6}", self.quality.signal_energy)?;
        writeln!(f, "error energy  : {:.6e}", self.quality.error_energy)?;
        if self.quality.is_exact() {
            writeln!(f, "SQER          : inf dB (exact reconstruction)")?;
        } else {
            writeln!(f, "SQER          : {:.3} dB", self.quality.sqer_db)?;
        }
        write!(
            f,
            "spectrum bins : {} -> {}",
            self.bins,
            self.paths.forward.display()
        )
    }
}

/// Outcome of [`Orchestrator::timing_run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingReport {
    pub iterations: usize,
    pub total: Duration,
}

impl TimingReport {
    /// Mean wall-clock time of one forward transform.
    pub fn per_iteration(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(0) => Duration::ZERO,
            Ok(iterations) => self.total / iterations,
            Err(_) => self.total.div_f64(self.iterations as f64),
        }
    }
}

impl fmt::Display for TimingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "iterations    : {}", self.iterations)?;
        writeln!(f, "total         : {:?}", self.total)?;
        write!(f, "per iteration : {:?}", self.per_iteration())
    }
}

/// Either workflow's result.
#[derive(Debug, Clone, PartialEq)]
pub enum RunReport {
    Accuracy(AccuracyReport),
    Timing(TimingReport),
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunReport::Accuracy(report) => fmt::Display::fmt(report, f),
            RunReport::Timing(report) => fmt::Display::fmt(report, f),
        }
    }
}

/// Drives one transform gateway through the accuracy and timing workflows.
///
/// The gateway is owned for the orchestrator's lifetime; a failure on any
/// gateway call or file write moves the orchestrator to [`RunState::Failed`]
/// and is returned to the caller as is.
pub struct Orchestrator<G: TransformGateway> {
    config: RunConfig,
    gateway: G,
    state: RunState,
}

impl<G: TransformGateway> fmt::Debug for Orchestrator<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("gateway", &self.gateway.name())
            .field("state", &self.state)
            .finish()
    }
}

impl<G: TransformGateway> Orchestrator<G> {
    /// Binds a validated configuration to a gateway baked for the same size.
    ///
    /// # Errors
    ///
    /// [`Error::LengthMismatch`] when `gateway.len() != config.size`.
    pub fn new(config: RunConfig, gateway: G) -> Result<Self> {
        check_len(config.size, gateway.len())?;
        let mut orchestrator = Self {
            config,
            gateway,
            state: RunState::Uninitialized,
        };
        orchestrator.transition(RunState::Configured);
        Ok(orchestrator)
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Hands the gateway back for release.
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// Runs the workflow `config.timing` selects.
    pub fn run(&mut self) -> Result<RunReport> {
        if self.config.timing {
            self.timing_run().map(RunReport::Timing)
        } else {
            self.accuracy_run().map(RunReport::Accuracy)
        }
    }

    /// Generate, write, forward, write spectrum, backward, write reconstruction, measure.
    pub fn accuracy_run(&mut self) -> Result<AccuracyReport> {
        self.begin()?;
        let result = self.accuracy_steps();
        self.finish(result)
    }

    /// Times `config.iterations` forward transforms of one generated signal.
    ///
    /// Nothing is written and no correctness check is made.
    pub fn timing_run(&mut self) -> Result<TimingReport> {
        self.begin()?;
        let result = self.timing_steps();
        self.finish(result)
    }

    fn accuracy_steps(&mut self) -> Result<AccuracyReport> {
        let paths = self.config.output_paths();

        let signal = signal::generate(self.config.size, &self.config.generation)?;
        debug!(samples = signal.len(), "signal generated");
        writer::write_samples(&paths.data, &signal)?;

        let raw = self.gateway.forward(&signal)?;
        let bins = writer::spectrum(&raw).len();
        writer::write_spectrum(&paths.forward, &raw)?;
        debug!(bins, "forward spectrum written");

        let reconstruction = self.gateway.backward(&raw)?;
        check_len(signal.len(), reconstruction.len())?;
        writer::write_samples(&paths.backward, &reconstruction)?;

        let quality = metric::measure(&signal, &reconstruction);
        info!(
            sqer_db = quality.sqer_db,
            signal_energy = quality.signal_energy,
            error_energy = quality.error_energy,
            "accuracy run complete"
        );

        Ok(AccuracyReport {
            quality,
            bins,
            paths,
        })
    }

    fn timing_steps(&mut self) -> Result<TimingReport> {
        let iterations = self.config.iterations;
        let signal = signal::generate(self.config.size, &self.config.generation)?;

        let start = Instant::now();
        for iteration in 0..iterations {
            let raw = self.gateway.forward(&signal)?;
            trace!(iteration, len = raw.len(), "forward pass");
        }
        let total = start.elapsed();

        let report = TimingReport { iterations, total };
        info!(
            iterations,
            total = ?report.total,
            per_iteration = ?report.per_iteration(),
            "timing run complete"
        );
        Ok(report)
    }

    fn begin(&mut self) -> Result<()> {
        match self.state {
            RunState::Configured | RunState::Completed => {
                info!(
                    n = self.config.size,
                    backend = self.gateway.name(),
                    timing = self.config.timing,
                    "run started"
                );
                self.transition(RunState::Running);
                Ok(())
            }
            state => Err(Error::InvalidState(state)),
        }
    }

    fn finish<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.transition(RunState::Completed),
            Err(err) => {
                error!(%err, "run failed");
                self.transition(RunState::Failed);
            }
        }
        result
    }

    fn transition(&mut self, next: RunState) {
        trace!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }
}
