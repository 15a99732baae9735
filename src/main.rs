use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use fft_roundtrip::config::{Cli, RunConfig};
use fft_roundtrip::gateway::{self, initialize};
use fft_roundtrip::orchestrator::Orchestrator;
use fft_roundtrip::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.validate() {
        Ok(config) => config,
        Err(errors) => {
            for message in errors.iter() {
                eprintln!("error: {message}");
            }
            return ExitCode::from(2);
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "aborted");
            eprintln!("error: {err}");
            if err.is_config() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(config: RunConfig) -> Result<(), Error> {
    let gateway = initialize(config.size, config.device)?;
    let mut orchestrator = Orchestrator::new(config, gateway)?;
    let report = orchestrator.run()?;

    println!("====================");
    println!(
        "\t{} FFT, N = {}",
        orchestrator.gateway().name(),
        orchestrator.config().size
    );
    println!("====================");
    println!("{report}");

    gateway::release(orchestrator.into_gateway());
    Ok(())
}
