//! Ephemeris query seam.
//!
//! The pipeline only needs `state(target, origin, epoch)`. [`KernelSource`]
//! answers it from an SPK file; tests substitute fixed vectors.

use std::path::Path;

use jpl_kernel::SpkKernel;

use crate::body::Body;
use crate::error::SnapshotError;

/// Julian Date of J2000.0 (2000-01-01 12:00 TDB).
pub const J2000_JD: f64 = 2_451_545.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// IAU 2012 astronomical unit in km.
pub const AU_KM: f64 = 149_597_870.7;

/// Convert a Julian Date in TDB to TDB seconds past J2000.0.
pub fn jd_to_tdb_seconds(jd: f64) -> f64 {
    (jd - J2000_JD) * SECONDS_PER_DAY
}

/// Cartesian state in AU and AU/day.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StateVector {
    pub position_au: [f64; 3],
    pub velocity_au_day: [f64; 3],
}

impl StateVector {
    /// Build from kernel units (km, km/s).
    pub fn from_km(position_km: [f64; 3], velocity_km_s: [f64; 3]) -> Self {
        Self {
            position_au: position_km.map(|x| x / AU_KM),
            velocity_au_day: velocity_km_s.map(|v| v * SECONDS_PER_DAY / AU_KM),
        }
    }

    /// Componentwise `self - other` for position and velocity independently.
    pub fn minus(&self, other: &Self) -> Self {
        let sub = |a: [f64; 3], b: [f64; 3]| [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
        Self {
            position_au: sub(self.position_au, other.position_au),
            velocity_au_day: sub(self.velocity_au_day, other.velocity_au_day),
        }
    }
}

/// Anything that can report a body's state relative to another body.
pub trait EphemerisSource {
    /// State of `target` relative to `origin` at a TDB Julian Date.
    fn state(
        &self,
        target: Body,
        origin: Body,
        epoch_tdb_jd: f64,
    ) -> Result<StateVector, SnapshotError>;
}

/// [`EphemerisSource`] backed by a loaded SPK kernel.
#[derive(Debug)]
pub struct KernelSource {
    kernel: SpkKernel,
}

impl KernelSource {
    pub fn new(kernel: SpkKernel) -> Self {
        Self { kernel }
    }

    pub fn open(path: &Path) -> Result<Self, SnapshotError> {
        Ok(Self::new(SpkKernel::load(path)?))
    }

    fn barycentric(&self, body: Body, epoch_tdb_s: f64) -> Result<StateVector, SnapshotError> {
        if body == Body::SolarSystemBarycenter {
            return Ok(StateVector::default());
        }
        let s = self.kernel.resolve_to_ssb(body.code(), epoch_tdb_s)?;
        Ok(StateVector::from_km([s[0], s[1], s[2]], [s[3], s[4], s[5]]))
    }
}

impl EphemerisSource for KernelSource {
    fn state(
        &self,
        target: Body,
        origin: Body,
        epoch_tdb_jd: f64,
    ) -> Result<StateVector, SnapshotError> {
        let epoch_tdb_s = jd_to_tdb_seconds(epoch_tdb_jd);
        // Direct segment first: DE files store planet barycenters against body 0.
        let (target_code, origin_code) = (target.code(), origin.code());
        if let Ok(eval) = self.kernel.evaluate(target_code, origin_code, epoch_tdb_s) {
            return Ok(StateVector::from_km(eval.position_km, eval.velocity_km_s));
        }
        let target_ssb = self.barycentric(target, epoch_tdb_s)?;
        let origin_ssb = self.barycentric(origin, epoch_tdb_s)?;
        Ok(target_ssb.minus(&origin_ssb))
    }
}
