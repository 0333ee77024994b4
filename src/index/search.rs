//! Byte-offset binary search over sorted record files.
//!
//! The search never addresses lines by index: it bisects the byte range
//! `[after_header, file_len - 1]`, snaps each midpoint forward to the next
//! line boundary, and decides from that line's key. If no boundary exists
//! between the midpoint and the upper bound, the target line cannot lie in
//! the right half and the search recurses left. The `low == high` base case
//! is decided from a single seek+read.
//!
//! Cost is O(log file_len) line reads, each at most one full line.
//!
//! # Examples
//!
//! ```
//! use coordseek::index::{FileLayout, PointScheme, SearchOutcome, SortedFileIndex};
//! use std::io::Cursor;
//!
//! let data = "pos,s1,s2\n100,A,G\n105,C,T\n";
//! let mut reader = Cursor::new(data.as_bytes().to_vec());
//! let layout = FileLayout::point_csv();
//! let scheme = PointScheme::csv();
//!
//! let outcome = SortedFileIndex::search(
//!     &mut reader, data.len() as u64, &layout, &scheme, "chr1", 105,
//! )?;
//! match outcome {
//!     SearchOutcome::Found(hit) => assert_eq!(hit.record.line, "105,C,T"),
//!     SearchOutcome::Absent { .. } => unreachable!(),
//! }
//! # Ok::<(), coordseek::CoordseekError>(())
//! ```

use crate::error::{CoordseekError, Result};
use crate::index::key::{FileLayout, KeyRelation, KeyScheme, Record};
use crate::index::reader::read_line_at;
use std::io::{BufRead, Read, Seek, SeekFrom};

/// A record located by search, together with its parsed key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit<K> {
    /// The parsed sort key.
    pub key: K,
    /// The located line and its byte offset.
    pub record: Record,
}

/// Result of a key search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome<K> {
    /// A record matching or containing the query.
    Found(Hit<K>),
    /// No record matches.
    Absent {
        /// For interval tables: the nearest record with `start > query`, if
        /// one exists. Lets callers compute gap extents without a second
        /// pass. Always `None` for point tables.
        successor: Option<Hit<K>>,
    },
}

/// Stateless binary search over the byte offsets of a sorted text file.
pub struct SortedFileIndex;

impl SortedFileIndex {
    /// Locates the record matching (point) or containing (interval) `query`.
    ///
    /// `chrom` is used only for error diagnostics. The reader is left at an
    /// unspecified position.
    ///
    /// # Errors
    ///
    /// [`CoordseekError::MalformedRecord`] if a complete line fails to parse
    /// its key, if a header line overruns the search range, or if the
    /// interval successor lookahead violates the sort invariant. Legitimate
    /// absence is [`SearchOutcome::Absent`], never an error.
    pub fn search<R, S>(
        reader: &mut R,
        file_len: u64,
        layout: &FileLayout,
        scheme: &S,
        chrom: &str,
        query: u64,
    ) -> Result<SearchOutcome<S::Key>>
    where
        R: BufRead + Seek,
        S: KeyScheme,
    {
        if file_len == 0 {
            return Ok(SearchOutcome::Absent { successor: None });
        }

        // high is the byte offset of the last byte in the file.
        let high = file_len - 1;
        let mut low = 0u64;

        for _ in 0..layout.header_lines {
            let (line, bytes) = read_line_at(reader, low)?;
            low += bytes;
            if bytes == 0 || low > high {
                return Err(CoordseekError::MalformedRecord {
                    chrom: chrom.to_string(),
                    offset: low.min(high),
                    line,
                    reason: "header extends onto or beyond the end of the file".to_string(),
                });
            }
        }

        Self::bisect(reader, low, high, file_len, scheme, chrom, query)
    }

    fn bisect<R, S>(
        reader: &mut R,
        mut low: u64,
        mut high: u64,
        file_len: u64,
        scheme: &S,
        chrom: &str,
        query: u64,
    ) -> Result<SearchOutcome<S::Key>>
    where
        R: BufRead + Seek,
        S: KeyScheme,
    {
        loop {
            if low == high {
                // low has only ever held line-start offsets, so this reads
                // one complete candidate line.
                return Self::decide_single(reader, low, file_len, scheme, chrom, query);
            }

            let mid = low + (high - low) / 2;

            // Snap the midpoint forward to the next line boundary.
            reader.seek(SeekFrom::Start(mid))?;
            let mut buf = Vec::new();
            let span = (&mut *reader)
                .take(high - mid + 1)
                .read_until(b'\n', &mut buf)? as u64;
            let found_newline = buf.last() == Some(&b'\n');

            if !found_newline || mid + span - 1 >= high {
                // The scan hit the upper bound before a newline: the target
                // line cannot start right of mid.
                high = mid;
                continue;
            }

            let line_start = mid + span;
            let (line, bytes) = read_line_at(reader, line_start)?;
            if bytes == 0 {
                return Err(CoordseekError::MalformedRecord {
                    chrom: chrom.to_string(),
                    offset: line_start,
                    line,
                    reason: "unexpected end of file inside the search range".to_string(),
                });
            }

            let key = parse_key_at(scheme, chrom, &line, line_start)?;
            match scheme.relation(&key, query) {
                KeyRelation::Matches => {
                    return Ok(SearchOutcome::Found(Hit {
                        key,
                        record: Record {
                            line,
                            offset: line_start,
                        },
                    }));
                }
                KeyRelation::After => high = mid,
                KeyRelation::Before => low = line_start,
            }
        }
    }

    /// Base case: one candidate line, decided without further bisection.
    fn decide_single<R, S>(
        reader: &mut R,
        offset: u64,
        file_len: u64,
        scheme: &S,
        chrom: &str,
        query: u64,
    ) -> Result<SearchOutcome<S::Key>>
    where
        R: BufRead + Seek,
        S: KeyScheme,
    {
        let (line, bytes) = read_line_at(reader, offset)?;
        if bytes == 0 {
            return Ok(SearchOutcome::Absent { successor: None });
        }

        let key = parse_key_at(scheme, chrom, &line, offset)?;
        match scheme.relation(&key, query) {
            KeyRelation::Matches => Ok(SearchOutcome::Found(Hit {
                key,
                record: Record { line, offset },
            })),
            KeyRelation::After => {
                // Bisection has already excluded every line left of this one
                // whose start could exceed the query, so for interval tables
                // this very line is the true successor.
                let successor = if S::TRACKS_SUCCESSOR {
                    Some(Hit {
                        key,
                        record: Record { line, offset },
                    })
                } else {
                    None
                };
                Ok(SearchOutcome::Absent { successor })
            }
            KeyRelation::Before => {
                if !S::TRACKS_SUCCESSOR {
                    return Ok(SearchOutcome::Absent { successor: None });
                }

                // The candidate ends at or before the query. Its physical
                // successor, if any, is the first line with start > query;
                // a one-line lookahead recovers it.
                let next_offset = offset + bytes;
                if next_offset >= file_len {
                    return Ok(SearchOutcome::Absent { successor: None });
                }

                let (next_line, next_bytes) = read_line_at(reader, next_offset)?;
                if next_bytes == 0 {
                    return Ok(SearchOutcome::Absent { successor: None });
                }

                let next_key = parse_key_at(scheme, chrom, &next_line, next_offset)?;
                if scheme.start_of(&next_key) <= query {
                    return Err(CoordseekError::MalformedRecord {
                        chrom: chrom.to_string(),
                        offset: next_offset,
                        line: next_line,
                        reason: format!(
                            "successor lookahead found start {} <= query {}; records out of order",
                            scheme.start_of(&next_key),
                            query
                        ),
                    });
                }

                Ok(SearchOutcome::Absent {
                    successor: Some(Hit {
                        key: next_key,
                        record: Record {
                            line: next_line,
                            offset: next_offset,
                        },
                    }),
                })
            }
        }
    }
}

/// Parses a key, promoting failure to a pass-fatal `MalformedRecord`.
pub(crate) fn parse_key_at<S: KeyScheme>(
    scheme: &S,
    chrom: &str,
    line: &str,
    offset: u64,
) -> Result<S::Key> {
    scheme
        .parse_key(line)
        .map_err(|reason| CoordseekError::MalformedRecord {
            chrom: chrom.to_string(),
            offset,
            line: line.to_string(),
            reason,
        })
}
