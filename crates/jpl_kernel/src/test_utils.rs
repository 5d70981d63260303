//! Synthetic SPK kernels for tests.
//!
//! Produces small, well-formed type 2 files so reader and pipeline tests do
//! not depend on the multi-megabyte DE kernels.

use std::path::Path;

use crate::daf::{ByteOrder, RECORD_BYTES, RECORD_WORDS};

/// One synthetic type 2 segment with equal-length records starting at `init`.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSegment {
    pub target: i32,
    pub center: i32,
    /// Start of coverage, TDB seconds past J2000.
    pub init: f64,
    /// Record length in seconds.
    pub interval: f64,
    /// Per-record x, y, z Chebyshev coefficients (same length throughout).
    pub records: Vec<[Vec<f64>; 3]>,
}

impl SyntheticSegment {
    /// One record in which the body moves uniformly: `position_km` at the
    /// record midpoint, constant `velocity_km_s`.
    pub fn linear(
        target: i32,
        center: i32,
        init: f64,
        interval: f64,
        position_km: [f64; 3],
        velocity_km_s: [f64; 3],
    ) -> Self {
        let radius = interval / 2.0;
        let axis = |k: usize| vec![position_km[k], velocity_km_s[k] * radius];
        Self {
            target,
            center,
            init,
            interval,
            records: vec![[axis(0), axis(1), axis(2)]],
        }
    }

    /// Midpoint of the single-record span produced by [`Self::linear`].
    pub fn midpoint(&self) -> f64 {
        self.init + self.interval / 2.0
    }

    fn end(&self) -> f64 {
        self.init + self.interval * self.records.len() as f64
    }

    fn record_size(&self) -> usize {
        2 + 3 * self.records.first().map_or(0, |r| r[0].len())
    }

    fn words(&self) -> Vec<f64> {
        let radius = self.interval / 2.0;
        let mut words = Vec::with_capacity(self.records.len() * self.record_size() + 4);
        for (i, record) in self.records.iter().enumerate() {
            words.push(self.init + (i as f64 + 0.5) * self.interval);
            words.push(radius);
            for axis in record {
                assert_eq!(
                    2 + 3 * axis.len(),
                    self.record_size(),
                    "all records of a synthetic segment need the same degree"
                );
                words.extend_from_slice(axis);
            }
        }
        words.extend([
            self.init,
            self.interval,
            self.record_size() as f64,
            self.records.len() as f64,
        ]);
        words
    }
}

/// Serialise segments into a DAF/SPK byte image.
///
/// Layout: file record, one summary record, one name record, then data.
pub fn spk_bytes(segments: &[SyntheticSegment], order: ByteOrder) -> Vec<u8> {
    const SUMMARY_WORDS: usize = 5;
    assert!(
        segments.len() <= (RECORD_WORDS - 3) / SUMMARY_WORDS,
        "synthetic kernels hold a single summary record"
    );

    let f64_bytes = |v: f64| match order {
        ByteOrder::Little => v.to_le_bytes(),
        ByteOrder::Big => v.to_be_bytes(),
    };
    let i32_bytes = |v: i32| match order {
        ByteOrder::Little => v.to_le_bytes(),
        ByteOrder::Big => v.to_be_bytes(),
    };

    let mut data = Vec::new();
    let mut summaries = Vec::new();
    let mut next_word = 3 * RECORD_WORDS + 1;
    for segment in segments {
        let words = segment.words();
        let first = next_word;
        let last = first + words.len() - 1;
        next_word = last + 1;

        let mut summary = Vec::with_capacity(SUMMARY_WORDS * 8);
        summary.extend(f64_bytes(segment.init));
        summary.extend(f64_bytes(segment.end()));
        for v in [
            segment.target,
            segment.center,
            1,
            2,
            first as i32,
            last as i32,
        ] {
            summary.extend(i32_bytes(v));
        }
        summaries.push(summary);
        for w in words {
            data.extend(f64_bytes(w));
        }
    }

    let mut bytes = vec![0u8; 3 * RECORD_BYTES];

    let file = &mut bytes[..RECORD_BYTES];
    file[0..8].copy_from_slice(b"DAF/SPK ");
    file[8..12].copy_from_slice(&i32_bytes(2));
    file[12..16].copy_from_slice(&i32_bytes(6));
    let name = b"helio synthetic kernel";
    file[16..76].fill(b' ');
    file[16..16 + name.len()].copy_from_slice(name);
    file[76..80].copy_from_slice(&i32_bytes(2));
    file[80..84].copy_from_slice(&i32_bytes(2));
    file[84..88].copy_from_slice(&i32_bytes(next_word as i32));
    file[88..96].copy_from_slice(order.format_id());

    let summary_record = &mut bytes[RECORD_BYTES..2 * RECORD_BYTES];
    summary_record[0..8].copy_from_slice(&f64_bytes(0.0));
    summary_record[8..16].copy_from_slice(&f64_bytes(0.0));
    summary_record[16..24].copy_from_slice(&f64_bytes(summaries.len() as f64));
    let mut offset = 24;
    for summary in &summaries {
        summary_record[offset..offset + summary.len()].copy_from_slice(summary);
        offset += summary.len();
    }

    bytes[2 * RECORD_BYTES..].fill(b' ');
    bytes.extend(data);
    let padded = bytes.len().div_ceil(RECORD_BYTES) * RECORD_BYTES;
    bytes.resize(padded, 0);
    bytes
}

/// Write a synthetic little-endian kernel to `path`.
pub fn write_spk(path: &Path, segments: &[SyntheticSegment]) -> std::io::Result<()> {
    std::fs::write(path, spk_bytes(segments, ByteOrder::Little))
}
