//! SPK segment descriptors and Chebyshev (types 2 and 3) record evaluation.
//!
//! Reference: NAIF SPK Required Reading (public domain, US Government work product).

use crate::chebyshev;
use crate::daf::Summary;
use crate::error::KernelError;

/// Chebyshev position only; velocity is the differentiated series.
pub const TYPE_CHEBYSHEV_POSITION: i32 = 2;
/// Chebyshev position and velocity, each with its own series.
pub const TYPE_CHEBYSHEV_STATE: i32 = 3;

/// Descriptor of one SPK segment, decoded from its DAF summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpkSegment {
    pub target: i32,
    pub center: i32,
    /// NAIF frame code (1 = J2000).
    pub frame: i32,
    pub data_type: i32,
    /// Coverage start, TDB seconds past J2000.
    pub start_epoch_s: f64,
    /// Coverage end, TDB seconds past J2000.
    pub end_epoch_s: f64,
    /// First data word (1-based DAF address).
    pub start_word: usize,
    /// Last data word (1-based DAF address).
    pub end_word: usize,
}

impl SpkSegment {
    pub(crate) fn from_summary(summary: &Summary) -> Result<Self, KernelError> {
        let shape_error = || {
            KernelError::InvalidFormat(format!(
                "SPK summaries need ND=2 NI=6, got ND={} NI={}",
                summary.doubles.len(),
                summary.integers.len()
            ))
        };
        let &[start, end] = summary.doubles.as_slice() else {
            return Err(shape_error());
        };
        let &[target, center, frame, data_type, first, last] = summary.integers.as_slice() else {
            return Err(shape_error());
        };
        let word = |v: i32| {
            usize::try_from(v)
                .ok()
                .filter(|&w| w > 0)
                .ok_or_else(|| KernelError::InvalidFormat(format!("bad segment address {v}")))
        };
        Ok(Self {
            target,
            center,
            frame,
            data_type,
            start_epoch_s: start,
            end_epoch_s: end,
            start_word: word(first)?,
            end_word: word(last)?,
        })
    }

    /// Whether the segment covers `epoch_tdb_s` (inclusive; NaN never matches).
    pub fn covers(&self, epoch_tdb_s: f64) -> bool {
        (self.start_epoch_s..=self.end_epoch_s).contains(&epoch_tdb_s)
    }
}

/// Decoded records of a type 2 or 3 segment.
#[derive(Clone, PartialEq)]
pub(crate) struct ChebyshevRecords {
    init: f64,
    interval: f64,
    record_size: usize,
    record_count: usize,
    /// Coefficients per component.
    degree_len: usize,
    has_velocity: bool,
    words: Vec<f64>,
}

impl std::fmt::Debug for ChebyshevRecords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChebyshevRecords")
            .field("init", &self.init)
            .field("interval", &self.interval)
            .field("record_size", &self.record_size)
            .field("record_count", &self.record_count)
            .finish_non_exhaustive()
    }
}

impl ChebyshevRecords {
    /// Build from the full word array of a segment. The last four words are
    /// the directory: `INIT`, `INTLEN`, `RSIZE`, `N`.
    pub(crate) fn from_segment_words(
        segment: &SpkSegment,
        mut words: Vec<f64>,
    ) -> Result<Self, KernelError> {
        let bad = |msg: String| {
            KernelError::InvalidFormat(format!("segment for body {}: {msg}", segment.target))
        };
        let has_velocity = match segment.data_type {
            TYPE_CHEBYSHEV_POSITION => false,
            TYPE_CHEBYSHEV_STATE => true,
            other => {
                return Err(KernelError::UnsupportedDataType {
                    target: segment.target,
                    data_type: other,
                });
            }
        };
        if words.len() < 4 {
            return Err(bad(format!("only {} words", words.len())));
        }
        let trailer = words.split_off(words.len() - 4);
        let (init, interval, rsize, n) = (trailer[0], trailer[1], trailer[2], trailer[3]);

        if !(interval.is_finite() && interval > 0.0) {
            return Err(bad(format!("interval length {interval}")));
        }
        // Neither count can exceed the number of data words.
        let limit = words.len() as f64;
        let whole = |v: f64| v.is_finite() && v >= 1.0 && v <= limit && v.fract() == 0.0;
        if !whole(rsize) || !whole(n) {
            return Err(bad(format!("record size {rsize}, record count {n}")));
        }
        let (record_size, record_count) = (rsize as usize, n as usize);

        let components = if has_velocity { 6 } else { 3 };
        if record_size < 2 + components || (record_size - 2) % components != 0 {
            return Err(bad(format!("record size {record_size} for type {}", segment.data_type)));
        }
        let needed = record_size
            .checked_mul(record_count)
            .filter(|&needed| needed <= words.len())
            .ok_or_else(|| {
                bad(format!(
                    "{record_count} records of {record_size} words exceed {} words",
                    words.len()
                ))
            })?;
        words.truncate(needed);

        Ok(Self {
            init,
            interval,
            record_size,
            record_count,
            degree_len: (record_size - 2) / components,
            has_velocity,
            words,
        })
    }

    /// Interpolate position (km) and velocity (km/s) at `epoch_tdb_s`.
    pub(crate) fn evaluate(&self, epoch_tdb_s: f64) -> ([f64; 3], [f64; 3]) {
        let offset = ((epoch_tdb_s - self.init) / self.interval).floor();
        // The segment end coincides with the end of the last record.
        let index = if offset <= 0.0 {
            0
        } else {
            (offset as usize).min(self.record_count - 1)
        };
        let record = &self.words[index * self.record_size..(index + 1) * self.record_size];
        let (mid, radius) = (record[0], record[1]);
        let s = (epoch_tdb_s - mid) / radius;
        let n = self.degree_len;
        let series = |k: usize| &record[2 + k * n..2 + (k + 1) * n];

        let mut position = [0.0; 3];
        let mut velocity = [0.0; 3];
        for axis in 0..3 {
            if self.has_velocity {
                position[axis] = chebyshev::value(series(axis), s);
                velocity[axis] = chebyshev::value(series(axis + 3), s);
            } else {
                let (p, dp_ds) = chebyshev::value_and_derivative(series(axis), s);
                position[axis] = p;
                velocity[axis] = dp_ds / radius;
            }
        }
        (position, velocity)
    }
}
