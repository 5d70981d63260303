//! Run configuration.

use std::path::PathBuf;

use crate::body::{Body, PLANETS};
use crate::error::SnapshotError;

/// NAIF generic kernels location of DE440.
pub const DEFAULT_KERNEL_URL: &str =
    "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de440.bsp";
pub const DEFAULT_KERNEL_PATH: &str = "./data/de440.bsp";
pub const DEFAULT_OUTPUT_PATH: &str = "./data/planets.json";
/// 2023-02-25 00:00 TDB.
pub const DEFAULT_EPOCH_TDB_JD: f64 = 2_460_000.5;
/// Largest coordinate magnitude after scaling.
pub const DEFAULT_DISPLAY_BOUND: f64 = 10.0;
pub const DEFAULT_DECIMALS: u32 = 5;

/// Everything a snapshot run needs. [`Default`] gives the stock DE440 run.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotConfig {
    pub kernel_url: String,
    pub kernel_path: PathBuf,
    pub output_path: PathBuf,
    pub epoch_tdb_jd: f64,
    /// Planets to extract, in output order.
    pub planets: Vec<Body>,
    pub display_bound: f64,
    /// Fractional digits kept in the output coordinates.
    pub decimals: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            kernel_url: DEFAULT_KERNEL_URL.to_string(),
            kernel_path: PathBuf::from(DEFAULT_KERNEL_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            epoch_tdb_jd: DEFAULT_EPOCH_TDB_JD,
            planets: PLANETS.to_vec(),
            display_bound: DEFAULT_DISPLAY_BOUND,
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl SnapshotConfig {
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.kernel_url.trim().is_empty() {
            return Err(SnapshotError::InvalidConfig("kernel_url must not be empty"));
        }
        if self.kernel_path.as_os_str().is_empty() {
            return Err(SnapshotError::InvalidConfig("kernel_path must not be empty"));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(SnapshotError::InvalidConfig("output_path must not be empty"));
        }
        if !self.epoch_tdb_jd.is_finite() {
            return Err(SnapshotError::InvalidConfig("epoch_tdb_jd must be finite"));
        }
        if self.planets.is_empty() {
            return Err(SnapshotError::InvalidConfig("planets must not be empty"));
        }
        if self.planets.iter().any(|b| !b.is_planet()) {
            return Err(SnapshotError::InvalidConfig(
                "planets must not contain the sun or the barycenter",
            ));
        }
        for (i, body) in self.planets.iter().enumerate() {
            if self.planets[..i].contains(body) {
                return Err(SnapshotError::InvalidConfig("planets must not repeat"));
            }
        }
        if !(self.display_bound.is_finite() && self.display_bound > 0.0) {
            return Err(SnapshotError::InvalidConfig("display_bound must be positive and finite"));
        }
        // 10^decimals has to stay exact in an f64.
        if self.decimals > 15 {
            return Err(SnapshotError::InvalidConfig("decimals must be at most 15"));
        }
        Ok(())
    }
}
