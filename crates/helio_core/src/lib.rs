//! Heliocentric planet snapshot pipeline.
//!
//! A run is linear: make sure the SPK kernel is on disk, difference each
//! planet's barycentric state against the sun's, scale everything by one
//! factor so the farthest coordinate lands on the display bound, round,
//! and write JSON.
//!
//! ```rust,ignore
//! use helio_core::{HttpFetcher, SnapshotConfig, run};
//!
//! let summary = run(&SnapshotConfig::default(), &HttpFetcher::new()?)?;
//! println!("scale factor {}", summary.scale_factor);
//! ```

pub mod body;
pub mod config;
pub mod document;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod source;
pub mod transform;

use std::path::PathBuf;

pub use body::{Body, PLANETS};
pub use config::SnapshotConfig;
pub use document::{EphemerisDocument, Units};
pub use error::SnapshotError;
pub use normalize::{max_abs_position, normalize, round_to, scale_factor};
pub use provider::{HttpFetcher, KernelFetcher, KernelStatus, ensure_kernel};
pub use source::{EphemerisSource, KernelSource, StateVector};
pub use transform::{PlanetRecord, PlanetTable, heliocentric_table};

/// Outcome of a completed [`run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub kernel: KernelStatus,
    pub output_path: PathBuf,
    pub planet_count: usize,
    pub scale_factor: f64,
}

/// Compute the normalised document from any ephemeris source.
pub fn build_document(
    source: &dyn EphemerisSource,
    config: &SnapshotConfig,
) -> Result<EphemerisDocument, SnapshotError> {
    config.validate()?;
    let mut planets = heliocentric_table(source, &config.planets, config.epoch_tdb_jd)?;
    let scale = normalize(&mut planets, config.display_bound, config.decimals);
    Ok(EphemerisDocument::new(config.epoch_tdb_jd, planets, scale))
}

/// Full run: provision the kernel, build the document, write it.
pub fn run(
    config: &SnapshotConfig,
    fetcher: &dyn KernelFetcher,
) -> Result<RunSummary, SnapshotError> {
    config.validate()?;
    let kernel = ensure_kernel(&config.kernel_path, &config.kernel_url, fetcher)?;
    let source = KernelSource::open(&config.kernel_path)?;
    let document = build_document(&source, config)?;
    document.write(&config.output_path)?;
    Ok(RunSummary {
        kernel,
        output_path: config.output_path.clone(),
        planet_count: document.planets.len(),
        scale_factor: document.scale_factor,
    })
}
