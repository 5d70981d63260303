//! Shared fixtures for pipeline integration tests.

use std::cell::Cell;
use std::path::Path;

use helio_core::source::{AU_KM, SECONDS_PER_DAY, StateVector, jd_to_tdb_seconds};
use helio_core::{Body, EphemerisSource, KernelFetcher, PLANETS, SnapshotError};
use jpl_kernel::ByteOrder;
use jpl_kernel::test_utils::{SyntheticSegment, spk_bytes};

pub const EPOCH_JD: f64 = 2_460_000.5;

/// Barycentric positions in AU (x, y, z) for the sun and the eight planets.
pub fn barycentric_positions() -> Vec<(Body, [f64; 3])> {
    vec![
        (Body::Sun, [-0.008, 0.004, 0.0002]),
        (Body::Mercury, [0.31, -0.18, 0.02]),
        (Body::Venus, [-0.52, 0.47, 0.03]),
        (Body::Earth, [-0.93, 0.35, 0.0]),
        (Body::Mars, [-0.61, 1.48, 0.04]),
        (Body::Jupiter, [4.82, 1.14, -0.11]),
        (Body::Saturn, [8.97, -4.06, -0.29]),
        (Body::Uranus, [12.3, 15.1, -0.1]),
        (Body::Neptune, [29.7, -3.2, -0.62]),
    ]
}

/// Barycentric velocities in AU/day, same order.
pub fn barycentric_velocities() -> Vec<(Body, [f64; 3])> {
    vec![
        (Body::Sun, [-0.000_005, -0.000_007, 0.0]),
        (Body::Mercury, [0.008, 0.025, 0.001]),
        (Body::Venus, [-0.013, -0.014, 0.0005]),
        (Body::Earth, [-0.0065, -0.016, 0.0]),
        (Body::Mars, [-0.0125, -0.0037, 0.0002]),
        (Body::Jupiter, [-0.0018, 0.0077, 0.0]),
        (Body::Saturn, [0.0021, 0.0051, -0.0002]),
        (Body::Uranus, [-0.0031, 0.0023, 0.0001]),
        (Body::Neptune, [0.0004, 0.0031, -0.00007]),
    ]
}

/// Stub source answering barycentric queries from the fixed tables.
pub struct FixedSource;

impl EphemerisSource for FixedSource {
    fn state(
        &self,
        target: Body,
        origin: Body,
        _epoch_tdb_jd: f64,
    ) -> Result<StateVector, SnapshotError> {
        assert_eq!(origin, Body::SolarSystemBarycenter);
        let position_au = lookup(&barycentric_positions(), target)?;
        let velocity_au_day = lookup(&barycentric_velocities(), target)?;
        Ok(StateVector {
            position_au,
            velocity_au_day,
        })
    }
}

fn lookup(table: &[(Body, [f64; 3])], body: Body) -> Result<[f64; 3], SnapshotError> {
    table
        .iter()
        .find(|(b, _)| *b == body)
        .map(|(_, v)| *v)
        .ok_or(SnapshotError::InvalidConfig("body missing from fixture"))
}

/// The fixture tables as an SPK kernel with one linear segment per body,
/// centred on the fixture epoch.
pub fn synthetic_kernel_bytes() -> Vec<u8> {
    let mid = jd_to_tdb_seconds(EPOCH_JD);
    let span = 10.0 * SECONDS_PER_DAY;
    let velocities = barycentric_velocities();
    let segments: Vec<SyntheticSegment> = barycentric_positions()
        .into_iter()
        .zip(velocities)
        .map(|((body, p), (_, v))| {
            SyntheticSegment::linear(
                body.code(),
                0,
                mid - span / 2.0,
                span,
                p.map(|x| x * AU_KM),
                v.map(|x| x * AU_KM / SECONDS_PER_DAY),
            )
        })
        .collect();
    spk_bytes(&segments, ByteOrder::Little)
}

/// Fetcher that "downloads" the synthetic kernel and counts calls.
pub struct SyntheticFetcher {
    pub calls: Cell<u32>,
}

impl SyntheticFetcher {
    pub fn new() -> Self {
        Self {
            calls: Cell::new(0),
        }
    }
}

impl KernelFetcher for SyntheticFetcher {
    fn fetch(&self, _url: &str, dest: &Path) -> Result<u64, SnapshotError> {
        self.calls.set(self.calls.get() + 1);
        let bytes = synthetic_kernel_bytes();
        std::fs::write(dest, &bytes).map_err(|e| SnapshotError::Io {
            path: dest.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.len() as u64)
    }
}

/// Largest |x| or |y| over the raw heliocentric fixture positions.
pub fn expected_max_abs() -> f64 {
    let positions = barycentric_positions();
    let sun = positions[0].1;
    positions
        .iter()
        .filter(|(b, _)| PLANETS.contains(b))
        .flat_map(|(_, p)| [(p[0] - sun[0]).abs(), (p[1] - sun[1]).abs()])
        .fold(0.0, f64::max)
}
