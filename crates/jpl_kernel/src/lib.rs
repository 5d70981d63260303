//! Read-only loader for NAIF SPK ephemeris kernels (JPL DE series).
//!
//! Parses the DAF container, decodes Chebyshev segments (SPK types 2 and 3)
//! and evaluates them. States are in km and km/s, in the segment's frame,
//! at TDB seconds past J2000.

pub mod chebyshev;
pub mod daf;
pub mod error;
pub mod spk;
pub mod test_utils;

use std::path::Path;

pub use daf::ByteOrder;
pub use error::KernelError;
pub use spk::SpkSegment;

use spk::ChebyshevRecords;

/// NAIF code of the solar-system barycenter.
pub const SSB: i32 = 0;

/// Position and velocity from a single segment evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpkEvaluation {
    pub position_km: [f64; 3],
    pub velocity_km_s: [f64; 3],
}

/// Map a planet body code (`x99`) to its system barycenter (`x`).
///
/// Codes that are not planet bodies are returned unchanged.
pub const fn planet_body_to_barycenter(code: i32) -> i32 {
    if code >= 199 && code <= 999 && code % 100 == 99 {
        code / 100
    } else {
        code
    }
}

/// A loaded SPK kernel.
pub struct SpkKernel {
    internal_name: String,
    segments: Vec<SpkSegment>,
    /// Parallel to `segments`; `None` for data types this reader skips.
    records: Vec<Option<ChebyshevRecords>>,
}

impl std::fmt::Debug for SpkKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpkKernel")
            .field("internal_name", &self.internal_name)
            .field("segments", &self.segments.len())
            .finish()
    }
}

impl SpkKernel {
    /// Load an SPK file from disk.
    pub fn load(path: &Path) -> Result<Self, KernelError> {
        let bytes = std::fs::read(path)?;
        let kernel = Self::from_bytes(&bytes)?;
        tracing::debug!(
            path = %path.display(),
            segments = kernel.segments.len(),
            "loaded SPK kernel"
        );
        Ok(kernel)
    }

    /// Parse an SPK kernel from its raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KernelError> {
        let file = daf::parse_file_record(bytes)?;
        if file.nd != 2 || file.ni != 6 {
            return Err(KernelError::InvalidFormat(format!(
                "not an SPK file: ND={} NI={}",
                file.nd, file.ni
            )));
        }

        let summaries = daf::read_summaries(bytes, &file)?;
        let mut segments = Vec::with_capacity(summaries.len());
        let mut records = Vec::with_capacity(summaries.len());
        for summary in &summaries {
            let segment = SpkSegment::from_summary(summary)?;
            let decoded = match segment.data_type {
                spk::TYPE_CHEBYSHEV_POSITION | spk::TYPE_CHEBYSHEV_STATE => {
                    let words = daf::read_words(
                        bytes,
                        file.byte_order,
                        segment.start_word,
                        segment.end_word,
                    )?;
                    Some(ChebyshevRecords::from_segment_words(&segment, words)?)
                }
                other => {
                    tracing::debug!(
                        target_body = segment.target,
                        data_type = other,
                        "skipping segment with unsupported data type"
                    );
                    None
                }
            };
            segments.push(segment);
            records.push(decoded);
        }

        Ok(Self {
            internal_name: file.internal_name,
            segments,
            records,
        })
    }

    /// Internal file name recorded in the DAF file record.
    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    /// All segment descriptors in file order.
    pub fn segments(&self) -> &[SpkSegment] {
        &self.segments
    }

    /// Center body of the highest-priority segment for `target`.
    pub fn center_for(&self, target: i32) -> Option<i32> {
        self.segments
            .iter()
            .rev()
            .find(|s| s.target == target)
            .map(|s| s.center)
    }

    /// Evaluate `target` relative to `center` at TDB seconds past J2000.
    ///
    /// Later segments take precedence over earlier ones with the same pair.
    pub fn evaluate(
        &self,
        target: i32,
        center: i32,
        epoch_tdb_s: f64,
    ) -> Result<SpkEvaluation, KernelError> {
        let mut pair_seen = false;
        for (segment, records) in self.segments.iter().zip(&self.records).rev() {
            if segment.target != target || segment.center != center {
                continue;
            }
            pair_seen = true;
            if !segment.covers(epoch_tdb_s) {
                continue;
            }
            let records = records.as_ref().ok_or(KernelError::UnsupportedDataType {
                target,
                data_type: segment.data_type,
            })?;
            let (position_km, velocity_km_s) = records.evaluate(epoch_tdb_s);
            return Ok(SpkEvaluation {
                position_km,
                velocity_km_s,
            });
        }

        if pair_seen {
            Err(KernelError::EpochOutOfRange {
                target,
                center,
                epoch_tdb_s,
            })
        } else {
            Err(KernelError::SegmentNotFound { target, center })
        }
    }

    /// State of `body` relative to the solar-system barycenter:
    /// `[x, y, z, vx, vy, vz]` in km and km/s.
    ///
    /// Walks the segment chain (e.g. 399 → 3 → 0), summing each link. A
    /// planet body code with no segment falls back to its barycenter.
    pub fn resolve_to_ssb(&self, body: i32, epoch_tdb_s: f64) -> Result<[f64; 6], KernelError> {
        let mut code = body;
        let mut state = [0.0f64; 6];
        // Every link consumes a segment, so a longer walk means a cycle.
        let mut remaining = self.segments.len() + 1;

        while code != SSB {
            if remaining == 0 {
                return Err(KernelError::InvalidFormat(format!(
                    "segment chain from body {body} does not reach the barycenter"
                )));
            }
            remaining -= 1;

            let Some(center) = self.center_for(code) else {
                let bary = planet_body_to_barycenter(code);
                if bary != code {
                    code = bary;
                    continue;
                }
                return Err(KernelError::SegmentNotFound {
                    target: code,
                    center: SSB,
                });
            };

            let eval = self.evaluate(code, center, epoch_tdb_s)?;
            for axis in 0..3 {
                state[axis] += eval.position_km[axis];
                state[axis + 3] += eval.velocity_km_s[axis];
            }
            code = center;
        }

        Ok(state)
    }
}
