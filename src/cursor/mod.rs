//! Stateful cursors over sorted record files.
//!
//! Coordinate queries arrive in long increasing runs (scanning a
//! 1000-position window one coordinate at a time), so re-running a full
//! binary search per query wastes I/O. [`IncrementalCursor`] remembers the
//! byte offset of the last resolved line (the "hint") and a bounded
//! [`LineCache`]; close repeated queries amortize to O(1) file work, and
//! only a cold cursor falls back to
//! [`SortedFileIndex`](crate::index::SortedFileIndex).
//!
//! One cursor owns exclusive, ordered access to one chromosome's file for
//! the duration of one pass. Queries must be non-decreasing while a hint is
//! set; backward access requires an explicit [`IncrementalCursor::rewind`].
//!
//! # Examples
//!
//! ```
//! use coordseek::cursor::{IncrementalCursor, Resolution};
//! use coordseek::index::{FileLayout, PointScheme};
//! use std::io::Cursor;
//!
//! let data = "pos,s1,s2\n100,A,G\n105,C,T\n";
//! let mut cursor = IncrementalCursor::from_reader(
//!     Cursor::new(data.as_bytes().to_vec()),
//!     data.len() as u64,
//!     "chr1",
//!     FileLayout::point_csv(),
//!     PointScheme::csv(),
//! );
//!
//! match cursor.resolve(100)? {
//!     Resolution::Hit(hit) => assert_eq!(hit.record.line, "100,A,G"),
//!     Resolution::Miss { .. } => unreachable!(),
//! }
//! // 102 is legitimately absent; 105 then resolves via forward scan.
//! assert!(matches!(cursor.resolve(102)?, Resolution::Miss { .. }));
//! assert!(matches!(cursor.resolve(105)?, Resolution::Hit(_)));
//! assert_eq!(cursor.stats().binary_searches, 1);
//! # Ok::<(), coordseek::CoordseekError>(())
//! ```

pub mod cache;

pub use cache::{CacheEntry, LineCache, DEFAULT_CAPACITY, DEFAULT_EVICT_BATCH};

use crate::error::{CoordseekError, Result};
use crate::index::key::{FileLayout, KeyRelation, KeyScheme, Record};
use crate::index::reader::{read_line_at, SortedFile};
use crate::index::search::{parse_key_at, Hit, SearchOutcome, SortedFileIndex};
use std::io::{BufRead, Seek};
use std::path::Path;

/// Outcome of a cursor resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<K> {
    /// The record matching or containing the query.
    Hit(Hit<K>),
    /// No record matches.
    Miss {
        /// Start coordinate of the nearest record with `start > query`, if
        /// the table tracks successors and one exists before end of file.
        next_start: Option<u64>,
    },
}

impl<K> Resolution<K> {
    /// Returns the hit, or `None` for a miss.
    pub fn hit(&self) -> Option<&Hit<K>> {
        match self {
            Resolution::Hit(hit) => Some(hit),
            Resolution::Miss { .. } => None,
        }
    }
}

/// Resolution counters, exposed for cost assertions and reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorStats {
    /// Queries answered from the cache with no file access.
    pub cache_hits: u64,
    /// Queries answered by a forward scan from the hint.
    pub forward_scans: u64,
    /// Queries that fell back to a full binary search.
    pub binary_searches: u64,
    /// Lines read during forward scans.
    pub scanned_lines: u64,
}

/// A hinted, caching cursor over one chromosome's sorted record file.
pub struct IncrementalCursor<S: KeyScheme, R = SortedFile> {
    chrom: String,
    reader: R,
    file_len: u64,
    layout: FileLayout,
    scheme: S,
    hint: Option<u64>,
    last_query: Option<u64>,
    cache: LineCache<S::Key>,
    stats: CursorStats,
}

impl<S: KeyScheme> IncrementalCursor<S, SortedFile> {
    /// Opens a cursor over a sorted record file on disk.
    ///
    /// Large files are memory-mapped, per
    /// [`MMAP_THRESHOLD`](crate::index::MMAP_THRESHOLD).
    pub fn open<P: AsRef<Path>>(
        path: P,
        chrom: impl Into<String>,
        layout: FileLayout,
        scheme: S,
    ) -> Result<Self> {
        let reader = SortedFile::open(path)?;
        let file_len = reader.len()?;
        Ok(Self::from_reader(reader, file_len, chrom, layout, scheme))
    }
}

impl<S: KeyScheme, R: BufRead + Seek> IncrementalCursor<S, R> {
    /// Creates a cursor over an already-open reader.
    ///
    /// `file_len` must be the total byte length of the underlying data.
    pub fn from_reader(
        reader: R,
        file_len: u64,
        chrom: impl Into<String>,
        layout: FileLayout,
        scheme: S,
    ) -> Self {
        IncrementalCursor {
            chrom: chrom.into(),
            reader,
            file_len,
            layout,
            scheme,
            hint: None,
            last_query: None,
            cache: LineCache::new(),
            stats: CursorStats::default(),
        }
    }

    /// Replaces the cache, e.g. to change capacity or disable caching with a
    /// capacity of 1.
    pub fn with_cache(mut self, cache: LineCache<S::Key>) -> Self {
        self.cache = cache;
        self
    }

    /// The chromosome this cursor is bound to.
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Resolution counters accumulated so far.
    pub fn stats(&self) -> CursorStats {
        self.stats
    }

    /// Byte offset of the last resolved line, if any.
    pub fn hint(&self) -> Option<u64> {
        self.hint
    }

    /// Clears the hint and ordering state, forcing the next resolve to run a
    /// fresh O(log n) binary search. Cached entries survive.
    pub fn rewind(&mut self) {
        self.hint = None;
        self.last_query = None;
    }

    /// Rewinds only if `query` would go backward relative to the last
    /// resolved query. Called at window starts, where overlapping windows
    /// legitimately step back.
    pub fn rewind_for(&mut self, query: u64) {
        if self.last_query.is_some_and(|last| query < last) {
            self.rewind();
        }
    }

    /// Resolves a query coordinate to its record.
    ///
    /// Probes the cache, then scans forward from the hint, then falls back
    /// to binary search. Success updates both the hint and the cache.
    ///
    /// # Errors
    ///
    /// [`CoordseekError::OutOfOrderQuery`] if `query` is smaller than the
    /// last resolved query while a hint is set (stale hint state is never
    /// silently reused); [`CoordseekError::MalformedRecord`] if a line fails
    /// to parse while the file is not exhausted. Legitimate absence is
    /// [`Resolution::Miss`], never an error.
    pub fn resolve(&mut self, query: u64) -> Result<Resolution<S::Key>> {
        if self.hint.is_some() {
            if let Some(last) = self.last_query {
                if query < last {
                    return Err(CoordseekError::OutOfOrderQuery {
                        chrom: self.chrom.clone(),
                        last,
                        query,
                    });
                }
            }
        }
        self.last_query = Some(query);

        if let Some(entry) = self.cache.get(query) {
            self.stats.cache_hits += 1;
            self.hint = Some(entry.offset);
            return Ok(Resolution::Hit(Hit {
                key: entry.key,
                record: Record {
                    line: entry.line.clone(),
                    offset: entry.offset,
                },
            }));
        }

        let outcome = match self.hint {
            Some(hint) => {
                self.stats.forward_scans += 1;
                self.scan_from(hint, query)?
            }
            None => {
                self.stats.binary_searches += 1;
                SortedFileIndex::search(
                    &mut self.reader,
                    self.file_len,
                    &self.layout,
                    &self.scheme,
                    &self.chrom,
                    query,
                )?
            }
        };

        match outcome {
            SearchOutcome::Found(hit) => {
                self.hint = Some(hit.record.offset);
                self.cache.insert(
                    query,
                    CacheEntry {
                        key: hit.key,
                        line: hit.record.line.clone(),
                        offset: hit.record.offset,
                    },
                );
                Ok(Resolution::Hit(hit))
            }
            SearchOutcome::Absent { successor } => Ok(Resolution::Miss {
                next_start: successor.map(|hit| self.scheme.start_of(&hit.key)),
            }),
        }
    }

    /// Scans forward line-by-line from `hint`, stopping at the first line
    /// whose key meets or exceeds the query.
    fn scan_from(&mut self, hint: u64, query: u64) -> Result<SearchOutcome<S::Key>> {
        let mut offset = hint;
        loop {
            let (line, bytes) = read_line_at(&mut self.reader, offset)?;
            if bytes == 0 {
                return Ok(SearchOutcome::Absent { successor: None });
            }
            self.stats.scanned_lines += 1;

            // A blank line before end of file is structural damage, not
            // absence; parse_key_at reports it as MalformedRecord.

            let key = parse_key_at(&self.scheme, &self.chrom, &line, offset)?;
            match self.scheme.relation(&key, query) {
                KeyRelation::Matches => {
                    return Ok(SearchOutcome::Found(Hit {
                        key,
                        record: Record { line, offset },
                    }));
                }
                KeyRelation::After => {
                    // Lines are sorted: the first overshoot proves absence,
                    // and for interval tables it is the true successor.
                    let successor = if S::TRACKS_SUCCESSOR {
                        Some(Hit {
                            key,
                            record: Record { line, offset },
                        })
                    } else {
                        None
                    };
                    return Ok(SearchOutcome::Absent { successor });
                }
                KeyRelation::Before => offset += bytes,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::key::{IntervalScheme, PointScheme};
    use std::io::Cursor;

    fn point_cursor(lines: &[(u64, &str)]) -> IncrementalCursor<PointScheme, Cursor<Vec<u8>>> {
        let mut data = String::from("pos,s1,s2\n");
        for (coord, rest) in lines {
            data.push_str(&format!("{},{}\n", coord, rest));
        }
        let len = data.len() as u64;
        IncrementalCursor::from_reader(
            Cursor::new(data.into_bytes()),
            len,
            "chr1",
            FileLayout::point_csv(),
            PointScheme::csv(),
        )
    }

    fn interval_cursor(
        lines: &[(u64, u64, &str)],
    ) -> IncrementalCursor<IntervalScheme, Cursor<Vec<u8>>> {
        let mut data = String::new();
        for (start, end, state) in lines {
            data.push_str(&format!("chr1 {} {} {}\n", start, end, state));
        }
        let len = data.len() as u64;
        IncrementalCursor::from_reader(
            Cursor::new(data.into_bytes()),
            len,
            "chr1",
            FileLayout::interval_bed(),
            IntervalScheme::bed(),
        )
    }

    #[test]
    fn test_hint_follows_forward_scan() {
        let mut cursor = point_cursor(&[(100, "A,G"), (105, "C,T"), (110, "G,G")]);

        assert!(matches!(cursor.resolve(100).unwrap(), Resolution::Hit(_)));
        assert_eq!(cursor.stats().binary_searches, 1);

        // Subsequent nearby queries ride the hint, not a new search.
        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));
        assert!(matches!(cursor.resolve(110).unwrap(), Resolution::Hit(_)));
        assert_eq!(cursor.stats().binary_searches, 1);
        assert_eq!(cursor.stats().forward_scans, 2);
    }

    #[test]
    fn test_point_miss_is_not_an_error() {
        let mut cursor = point_cursor(&[(100, "A,G"), (105, "C,T")]);

        assert!(matches!(cursor.resolve(100).unwrap(), Resolution::Hit(_)));
        assert!(matches!(
            cursor.resolve(102).unwrap(),
            Resolution::Miss { next_start: None }
        ));
        // The hint survives the miss; 105 resolves by scan.
        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));
        assert_eq!(cursor.stats().binary_searches, 1);
    }

    #[test]
    fn test_cache_hit_reads_nothing() {
        let mut cursor = point_cursor(&[(100, "A,G"), (105, "C,T")]);

        assert!(matches!(cursor.resolve(100).unwrap(), Resolution::Hit(_)));
        let before = cursor.stats();

        // Same query again: cache only.
        let hit = match cursor.resolve(100).unwrap() {
            Resolution::Hit(hit) => hit,
            Resolution::Miss { .. } => panic!("cached query must hit"),
        };
        assert_eq!(hit.record.line, "100,A,G");

        let after = cursor.stats();
        assert_eq!(after.cache_hits, before.cache_hits + 1);
        assert_eq!(after.forward_scans, before.forward_scans);
        assert_eq!(after.binary_searches, before.binary_searches);
        assert_eq!(after.scanned_lines, before.scanned_lines);
    }

    #[test]
    fn test_out_of_order_rejected_while_hinted() {
        let mut cursor = point_cursor(&[(100, "A,G"), (105, "C,T")]);

        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));
        let err = cursor.resolve(100).unwrap_err();
        assert!(matches!(
            err,
            CoordseekError::OutOfOrderQuery {
                last: 105,
                query: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_rewind_allows_backward_access() {
        let mut cursor = point_cursor(&[(100, "A,G"), (105, "C,T")]);

        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));
        cursor.rewind();
        assert!(matches!(cursor.resolve(100).unwrap(), Resolution::Hit(_)));
        assert_eq!(cursor.stats().binary_searches, 2);
    }

    #[test]
    fn test_rewind_for_only_on_backward() {
        let mut cursor = point_cursor(&[(100, "A,G"), (105, "C,T"), (110, "G,G")]);

        assert!(matches!(cursor.resolve(100).unwrap(), Resolution::Hit(_)));
        cursor.rewind_for(105); // forward: hint kept
        assert!(cursor.hint().is_some());
        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));

        cursor.rewind_for(100); // backward: hint cleared
        assert!(cursor.hint().is_none());
        assert!(matches!(cursor.resolve(100).unwrap(), Resolution::Hit(_)));
    }

    #[test]
    fn test_interval_miss_reports_next_start() {
        let mut cursor = interval_cursor(&[(0, 100, "S1"), (200, 300, "S2")]);

        assert!(matches!(cursor.resolve(50).unwrap(), Resolution::Hit(_)));
        match cursor.resolve(150).unwrap() {
            Resolution::Miss { next_start } => assert_eq!(next_start, Some(200)),
            Resolution::Hit(_) => panic!("150 lies in a gap"),
        }
        // Gap miss keeps the hint usable for the next query.
        assert!(matches!(cursor.resolve(250).unwrap(), Resolution::Hit(_)));
        assert_eq!(cursor.stats().binary_searches, 1);
    }

    #[test]
    fn test_interval_miss_at_eof() {
        let mut cursor = interval_cursor(&[(0, 100, "S1")]);

        assert!(matches!(cursor.resolve(10).unwrap(), Resolution::Hit(_)));
        match cursor.resolve(500).unwrap() {
            Resolution::Miss { next_start } => assert_eq!(next_start, None),
            Resolution::Hit(_) => panic!("500 is past all intervals"),
        }
    }

    #[test]
    fn test_malformed_line_surfaces_through_scan() {
        // A clean leading run so the initial binary search stays left of the
        // damage; the forward scan toward 200 then reads the bad line.
        let mut data = String::from("pos,s1,s2\n");
        for coord in 100..110u64 {
            data.push_str(&format!("{},A,G\n", coord));
        }
        data.push_str("not-a-number,B\n200,C,T\n");
        let len = data.len() as u64;
        let mut cursor = IncrementalCursor::from_reader(
            Cursor::new(data.into_bytes()),
            len,
            "chr7",
            FileLayout::point_csv(),
            PointScheme::csv(),
        );

        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));
        let err = cursor.resolve(200).unwrap_err();
        match err {
            CoordseekError::MalformedRecord { chrom, line, .. } => {
                assert_eq!(chrom, "chr7");
                assert!(line.starts_with("not-a-number"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_line_mid_file_is_fatal_not_a_miss() {
        // A blank line hides every record past it from a forward scan; it
        // must surface as MalformedRecord, never as a miss with no successor.
        let mut data = String::from("pos,s1,s2\n");
        for coord in 100..110u64 {
            data.push_str(&format!("{},A,G\n", coord));
        }
        data.push_str("\n200,C,T\n");
        let len = data.len() as u64;
        let mut cursor = IncrementalCursor::from_reader(
            Cursor::new(data.into_bytes()),
            len,
            "chr1",
            FileLayout::point_csv(),
            PointScheme::csv(),
        );

        assert!(matches!(cursor.resolve(105).unwrap(), Resolution::Hit(_)));
        let err = cursor.resolve(200).unwrap_err();
        assert!(matches!(err, CoordseekError::MalformedRecord { .. }));
    }
}
