use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use helio_core::config::{
    DEFAULT_EPOCH_TDB_JD, DEFAULT_KERNEL_PATH, DEFAULT_KERNEL_URL, DEFAULT_OUTPUT_PATH,
};
use helio_core::{Body, HttpFetcher, KernelStatus, PLANETS, SnapshotConfig, SnapshotError, run};

#[derive(Parser)]
#[command(
    name = "helio",
    about = "Write a normalised heliocentric snapshot of the eight planets"
)]
struct Cli {
    /// URL the SPK kernel is downloaded from when missing locally
    #[arg(long, default_value = DEFAULT_KERNEL_URL)]
    kernel_url: String,
    /// Local SPK kernel path
    #[arg(long, default_value = DEFAULT_KERNEL_PATH)]
    kernel_path: PathBuf,
    /// Output JSON path
    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,
    /// Epoch as Julian Date TDB
    #[arg(long, default_value_t = DEFAULT_EPOCH_TDB_JD)]
    epoch_jd: f64,
    /// Comma-separated planets in output order (default: mercury through neptune)
    #[arg(long, value_delimiter = ',')]
    planets: Vec<Body>,
}

impl Cli {
    fn into_config(self) -> SnapshotConfig {
        SnapshotConfig {
            kernel_url: self.kernel_url,
            kernel_path: self.kernel_path,
            output_path: self.output,
            epoch_tdb_jd: self.epoch_jd,
            planets: if self.planets.is_empty() {
                PLANETS.to_vec()
            } else {
                self.planets
            },
            ..SnapshotConfig::default()
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn report(err: &SnapshotError) {
    eprintln!("error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn main() {
    init_logging();
    let config = Cli::parse().into_config();

    let fetcher = match HttpFetcher::new() {
        Ok(f) => f,
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    };

    match run(&config, &fetcher) {
        Ok(summary) => {
            let downloaded = match summary.kernel {
                KernelStatus::Downloaded { bytes } => bytes,
                KernelStatus::AlreadyPresent => 0,
            };
            tracing::info!(
                planets = summary.planet_count,
                output = %summary.output_path.display(),
                scale_factor = summary.scale_factor,
                downloaded_bytes = downloaded,
                "snapshot complete"
            );
        }
        Err(e) => {
            report(&e);
            std::process::exit(1);
        }
    }
}
