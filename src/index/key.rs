//! Key extraction and comparison for sorted record files.
//!
//! Annotation tables differ only in how a line maps to a sort key: alignment
//! tables carry a single integer coordinate in their first comma-separated
//! field, segmentation and conservation-element tables carry a half-open
//! `[start, end)` interval in whitespace-separated columns. The
//! [`KeyScheme`] trait captures exactly that difference so one search routine
//! and one cursor serve every table layout.
//!
//! # Examples
//!
//! ```
//! use coordseek::index::{IntervalScheme, KeyRelation, KeyScheme, PointScheme};
//!
//! let point = PointScheme::csv();
//! let key = point.parse_key("10468,A,G,C").unwrap();
//! assert_eq!(point.relation(&key, 10468), KeyRelation::Matches);
//!
//! let interval = IntervalScheme::bed();
//! let key = interval.parse_key("chr19 0 60000 U96").unwrap();
//! assert_eq!(interval.relation(&key, 59_999), KeyRelation::Matches);
//! assert_eq!(interval.relation(&key, 60_000), KeyRelation::Before);
//! ```

use std::fmt;

/// How fields are separated within a record line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// A single delimiter character (e.g. `,` for alignment tables).
    Char(char),
    /// Any run of ASCII whitespace (BED-like tables).
    Whitespace,
}

impl Delimiter {
    /// Returns the `index`-th field of `line`, if present.
    pub fn field<'a>(&self, line: &'a str, index: usize) -> Option<&'a str> {
        match self {
            Delimiter::Char(c) => line.split(*c).nth(index),
            Delimiter::Whitespace => line.split_whitespace().nth(index),
        }
    }
}

/// Structural description of a sorted record file.
///
/// Files are addressed by byte offset, never by line index; the layout only
/// records what must be skipped (header lines) and how fields split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLayout {
    /// Field delimiter.
    pub delimiter: Delimiter,
    /// Number of leading header lines to skip before the first record.
    pub header_lines: usize,
}

impl FileLayout {
    /// Comma-delimited with one header line (per-chromosome alignment CSVs).
    pub fn point_csv() -> Self {
        FileLayout {
            delimiter: Delimiter::Char(','),
            header_lines: 1,
        }
    }

    /// Whitespace-delimited with no header (segmentation/element tables).
    pub fn interval_bed() -> Self {
        FileLayout {
            delimiter: Delimiter::Whitespace,
            header_lines: 0,
        }
    }
}

/// A resolved line and the byte offset of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The full record line, trailing newline stripped.
    pub line: String,
    /// Byte offset of the line's first character; always a valid line start.
    pub offset: u64,
}

/// Position of a record's key relative to a query coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRelation {
    /// The record lies entirely before the query (key < query, or end <= query).
    Before,
    /// The record matches or contains the query.
    Matches,
    /// The record lies entirely after the query (key > query, or start > query).
    After,
}

/// Key extraction and comparison capability for one table layout.
///
/// Implementations must be cheap to call per line; `parse_key` failures are
/// reported as a reason string and promoted to
/// [`CoordseekError::MalformedRecord`](crate::CoordseekError::MalformedRecord)
/// by callers that know the chromosome and byte offset.
pub trait KeyScheme {
    /// Parsed key type.
    type Key: Copy + fmt::Debug;

    /// Whether misses can report the nearest record with `start > query`.
    ///
    /// Interval tables support this (the successor bounds a gap); point
    /// tables do not, a missing coordinate is simply absent.
    const TRACKS_SUCCESSOR: bool;

    /// Parses the sort key from a record line.
    fn parse_key(&self, line: &str) -> std::result::Result<Self::Key, String>;

    /// Compares a parsed key against a query coordinate.
    fn relation(&self, key: &Self::Key, query: u64) -> KeyRelation;

    /// The coordinate at which the keyed record begins.
    fn start_of(&self, key: &Self::Key) -> u64;
}

/// Point keys: one record per exact coordinate, strictly increasing.
#[derive(Debug, Clone, Copy)]
pub struct PointScheme {
    delimiter: Delimiter,
    field: usize,
}

impl PointScheme {
    /// A point scheme reading the given field with the given delimiter.
    pub fn new(delimiter: Delimiter, field: usize) -> Self {
        PointScheme { delimiter, field }
    }

    /// First comma-separated field, the alignment-table convention.
    pub fn csv() -> Self {
        PointScheme::new(Delimiter::Char(','), 0)
    }
}

impl KeyScheme for PointScheme {
    type Key = u64;

    const TRACKS_SUCCESSOR: bool = false;

    fn parse_key(&self, line: &str) -> std::result::Result<u64, String> {
        let field = self
            .delimiter
            .field(line, self.field)
            .ok_or_else(|| format!("missing coordinate field {}", self.field))?;
        field
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("coordinate field {:?}: {}", field, e))
    }

    fn relation(&self, key: &u64, query: u64) -> KeyRelation {
        match key.cmp(&query) {
            std::cmp::Ordering::Less => KeyRelation::Before,
            std::cmp::Ordering::Equal => KeyRelation::Matches,
            std::cmp::Ordering::Greater => KeyRelation::After,
        }
    }

    fn start_of(&self, key: &u64) -> u64 {
        *key
    }
}

/// Interval keys: one record per half-open `[start, end)` range, sorted by
/// start and non-overlapping.
#[derive(Debug, Clone, Copy)]
pub struct IntervalScheme {
    delimiter: Delimiter,
    start_field: usize,
    end_field: usize,
}

impl IntervalScheme {
    /// An interval scheme reading the given start/end fields.
    pub fn new(delimiter: Delimiter, start_field: usize, end_field: usize) -> Self {
        IntervalScheme {
            delimiter,
            start_field,
            end_field,
        }
    }

    /// `chrom start end ...` columns, the segmentation-table convention.
    pub fn bed() -> Self {
        IntervalScheme::new(Delimiter::Whitespace, 1, 2)
    }

    /// `bin chrom start end ...` columns, the UCSC element-table convention.
    pub fn ucsc_elements() -> Self {
        IntervalScheme::new(Delimiter::Whitespace, 2, 3)
    }
}

impl KeyScheme for IntervalScheme {
    type Key = (u64, u64);

    const TRACKS_SUCCESSOR: bool = true;

    fn parse_key(&self, line: &str) -> std::result::Result<(u64, u64), String> {
        let start = self
            .delimiter
            .field(line, self.start_field)
            .ok_or_else(|| format!("missing start field {}", self.start_field))?;
        let end = self
            .delimiter
            .field(line, self.end_field)
            .ok_or_else(|| format!("missing end field {}", self.end_field))?;

        let start = start
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("start field {:?}: {}", start, e))?;
        let end = end
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("end field {:?}: {}", end, e))?;

        if start >= end {
            return Err(format!("empty interval [{}, {})", start, end));
        }

        Ok((start, end))
    }

    fn relation(&self, key: &(u64, u64), query: u64) -> KeyRelation {
        let (start, end) = *key;
        if end <= query {
            KeyRelation::Before
        } else if start <= query {
            KeyRelation::Matches
        } else {
            KeyRelation::After
        }
    }

    fn start_of(&self, key: &(u64, u64)) -> u64 {
        key.0
    }
}
