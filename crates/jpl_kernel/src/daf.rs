//! DAF (Double precision Array File) container parsing.
//!
//! A DAF file is a sequence of 1024-byte records. Record 1 is the file
//! record; array summaries live in a doubly linked list of summary records,
//! each followed by a name record. Array data is addressed in 1-based
//! 8-byte words.
//!
//! Reference: NAIF DAF Required Reading (public domain, US Government work product).

use crate::error::KernelError;

/// Size of one DAF record in bytes.
pub const RECORD_BYTES: usize = 1024;
/// Size of one DAF word (a double) in bytes.
pub const WORD_BYTES: usize = 8;
/// Doubles per record.
pub const RECORD_WORDS: usize = RECORD_BYTES / WORD_BYTES;

/// Binary format of the numeric data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Format string stored in the file record (`LOCFMT`).
    pub const fn format_id(self) -> &'static [u8; 8] {
        match self {
            Self::Little => b"LTL-IEEE",
            Self::Big => b"BIG-IEEE",
        }
    }

    pub(crate) fn read_f64(self, bytes: &[u8], offset: usize) -> Option<f64> {
        let raw: [u8; 8] = bytes.get(offset..offset + 8)?.try_into().ok()?;
        Some(match self {
            Self::Little => f64::from_le_bytes(raw),
            Self::Big => f64::from_be_bytes(raw),
        })
    }

    pub(crate) fn read_i32(self, bytes: &[u8], offset: usize) -> Option<i32> {
        let raw: [u8; 4] = bytes.get(offset..offset + 4)?.try_into().ok()?;
        Some(match self {
            Self::Little => i32::from_le_bytes(raw),
            Self::Big => i32::from_be_bytes(raw),
        })
    }
}

/// Parsed DAF file record.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    /// `DAF/SPK ` for modern SPK files.
    pub id_word: String,
    /// Number of double components per summary.
    pub nd: usize,
    /// Number of integer components per summary.
    pub ni: usize,
    pub internal_name: String,
    /// Record number of the first summary record.
    pub first_summary: usize,
    /// Record number of the last summary record.
    pub last_summary: usize,
    /// First free word address.
    pub free_address: usize,
    pub byte_order: ByteOrder,
}

impl FileRecord {
    /// Summary size in words: `ND + (NI + 1) / 2`.
    pub fn summary_words(&self) -> usize {
        self.nd + self.ni.div_ceil(2)
    }
}

/// One array summary: `nd` doubles followed by `ni` integers.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub doubles: Vec<f64>,
    pub integers: Vec<i32>,
}

fn invalid(msg: impl Into<String>) -> KernelError {
    KernelError::InvalidFormat(msg.into())
}

fn ascii(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}

/// Parse the file record at the start of a DAF.
pub fn parse_file_record(bytes: &[u8]) -> Result<FileRecord, KernelError> {
    if bytes.len() < RECORD_BYTES {
        return Err(invalid(format!("file is {} bytes, shorter than one DAF record", bytes.len())));
    }

    let id_word = ascii(&bytes[0..8]);
    if !id_word.starts_with("DAF/") && id_word != "NAIF/DAF" {
        return Err(invalid(format!("unrecognised ID word {id_word:?}")));
    }

    let byte_order = match &bytes[88..96] {
        b"LTL-IEEE" => ByteOrder::Little,
        b"BIG-IEEE" => ByteOrder::Big,
        _ => infer_byte_order(bytes)?,
    };

    let int_at = |offset: usize| -> Result<usize, KernelError> {
        let value = byte_order
            .read_i32(bytes, offset)
            .ok_or_else(|| invalid("truncated file record"))?;
        usize::try_from(value).map_err(|_| invalid(format!("negative file record field {value}")))
    };

    let nd = int_at(8)?;
    let ni = int_at(12)?;
    if nd + ni.div_ceil(2) > RECORD_WORDS - 3 {
        return Err(invalid(format!("summary format ND={nd} NI={ni} too large")));
    }

    Ok(FileRecord {
        id_word,
        nd,
        ni,
        internal_name: ascii(&bytes[16..76]),
        first_summary: int_at(76)?,
        last_summary: int_at(80)?,
        free_address: int_at(84)?,
        byte_order,
    })
}

/// Pre-1995 files leave `LOCFMT` blank; the ND word is small and positive
/// only when read in the native order.
fn infer_byte_order(bytes: &[u8]) -> Result<ByteOrder, KernelError> {
    for order in [ByteOrder::Little, ByteOrder::Big] {
        if let Some(nd) = order.read_i32(bytes, 8)
            && (1..=124).contains(&nd)
        {
            return Ok(order);
        }
    }
    Err(invalid("cannot determine numeric byte order"))
}

/// Walk the summary record list and collect every array summary.
pub fn read_summaries(bytes: &[u8], record: &FileRecord) -> Result<Vec<Summary>, KernelError> {
    let order = record.byte_order;
    let summary_words = record.summary_words();
    let per_record = (RECORD_WORDS - 3) / summary_words.max(1);
    let total_records = bytes.len() / RECORD_BYTES;

    let mut summaries = Vec::new();
    let mut current = record.first_summary;
    let mut visited = 0usize;

    while current != 0 {
        visited += 1;
        if visited > total_records || current > total_records {
            return Err(invalid(format!("summary record {current} out of bounds")));
        }
        let base = (current - 1) * RECORD_BYTES;
        let control = |index: usize| -> Result<usize, KernelError> {
            let value = order
                .read_f64(bytes, base + index * WORD_BYTES)
                .ok_or_else(|| invalid("truncated summary record"))?;
            word_to_count(value)
        };
        let next = control(0)?;
        let count = control(2)?;
        if count > per_record {
            return Err(invalid(format!(
                "summary record {current} claims {count} summaries, at most {per_record} fit"
            )));
        }

        for i in 0..count {
            let start = base + (3 + i * summary_words) * WORD_BYTES;
            let doubles = (0..record.nd)
                .map(|k| order.read_f64(bytes, start + k * WORD_BYTES))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("truncated summary"))?;
            let int_start = start + record.nd * WORD_BYTES;
            let integers = (0..record.ni)
                .map(|k| order.read_i32(bytes, int_start + k * 4))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| invalid("truncated summary"))?;
            summaries.push(Summary { doubles, integers });
        }

        current = next;
    }

    Ok(summaries)
}

/// Read words `first..=last` (1-based addresses).
pub fn read_words(
    bytes: &[u8],
    order: ByteOrder,
    first: usize,
    last: usize,
) -> Result<Vec<f64>, KernelError> {
    if first == 0 || last < first {
        return Err(invalid(format!("bad word range {first}..{last}")));
    }
    (first..=last)
        .map(|address| order.read_f64(bytes, (address - 1) * WORD_BYTES))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| invalid(format!("word range {first}..{last} past end of file")))
}

/// Control words are stored as doubles holding small non-negative integers.
fn word_to_count(value: f64) -> Result<usize, KernelError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < u32::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(invalid(format!("bad control word {value}")))
    }
}
