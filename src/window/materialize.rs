//! Driving a cursor across a coordinate window.
//!
//! The materializer turns a window `[start, end)` into exactly
//! `end - start` per-position labels. Interval tables are filled
//! run-length-wise: one resolver call per distinct overlapping record, with
//! gaps extended to the reported successor start (or the window end) in one
//! step. Point tables resolve once per position and lean on the cursor's
//! hint and cache instead.
//!
//! # Examples
//!
//! ```
//! use coordseek::cursor::IncrementalCursor;
//! use coordseek::index::{FileLayout, IntervalScheme};
//! use coordseek::window::{GapPolicy, WindowMaterializer};
//! use std::io::Cursor;
//!
//! let data = "chr1 0 100 S1\nchr1 100 250 S2\n";
//! let mut cursor = IncrementalCursor::from_reader(
//!     Cursor::new(data.as_bytes().to_vec()),
//!     data.len() as u64,
//!     "chr1",
//!     FileLayout::interval_bed(),
//!     IntervalScheme::bed(),
//! );
//!
//! let materializer = WindowMaterializer::new(GapPolicy::Fill("gap".to_string()));
//! let window = materializer.intervals(&mut cursor, 50, 150, |record| {
//!     Ok(record.line.split_whitespace().last().unwrap_or("?").to_string())
//! })?;
//!
//! assert_eq!(window.len(), 100);
//! assert_eq!(window.labels()[0], "S1");
//! assert_eq!(window.labels()[50], "S2");
//! assert_eq!(window.gap_positions(), 0);
//! # Ok::<(), coordseek::CoordseekError>(())
//! ```

use crate::cursor::{IncrementalCursor, Resolution};
use crate::error::{CoordseekError, Result};
use crate::index::key::{IntervalScheme, PointScheme, Record};
use crate::window::GapPolicy;
use std::io::{BufRead, Seek};

/// A fully labeled window: one label per position, plus accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedWindow<L> {
    start: u64,
    labels: Vec<L>,
    gap_positions: u64,
    resolver_calls: u64,
}

impl<L> MaterializedWindow<L> {
    /// Window start coordinate (0-based; the first label belongs here).
    pub fn start(&self) -> u64 {
        self.start
    }

    /// The per-position labels, in forward coordinate order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }

    /// Consumes the window, yielding the forward-ordered labels.
    pub fn into_labels(self) -> Vec<L> {
        self.labels
    }

    /// Number of positions (always `end - start` of the materialized window).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the window is empty (never true for a valid window).
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of positions that received the gap filler, for downstream
    /// data-quality reporting.
    pub fn gap_positions(&self) -> u64 {
        self.gap_positions
    }

    /// Number of resolver calls issued; bounded by the number of distinct
    /// overlapping records for interval tables.
    pub fn resolver_calls(&self) -> u64 {
        self.resolver_calls
    }

    /// The position-reversed, value-mirrored view of this window.
    ///
    /// Derived from the single resolution pass; the file is never re-scanned
    /// in reverse. For nucleotide-valued labels pass
    /// [`complement_base`](crate::window::complement_base) to obtain the
    /// reverse complement; for symmetric labels pass `Clone::clone`.
    pub fn reversed_with<F>(&self, mirror: F) -> Vec<L>
    where
        F: Fn(&L) -> L,
    {
        self.labels.iter().rev().map(mirror).collect()
    }
}

/// Materializes coordinate windows against a cursor with a gap policy.
#[derive(Debug, Clone)]
pub struct WindowMaterializer<L> {
    policy: GapPolicy<L>,
}

impl<L: Clone> WindowMaterializer<L> {
    /// Creates a materializer with the given gap policy.
    pub fn new(policy: GapPolicy<L>) -> Self {
        WindowMaterializer { policy }
    }

    /// Materializes `[start, end)` against an interval-indexed table.
    ///
    /// Issues one resolver call per distinct overlapping record or gap run,
    /// not per position. The cursor is rewound automatically if the window
    /// starts before the last resolved query (overlapping windows).
    ///
    /// # Errors
    ///
    /// [`CoordseekError::InvalidWindow`] for an empty window;
    /// [`CoordseekError::CoverageGap`] under [`GapPolicy::Strict`];
    /// propagates `MalformedRecord` and label-function errors.
    pub fn intervals<R, F>(
        &self,
        cursor: &mut IncrementalCursor<IntervalScheme, R>,
        start: u64,
        end: u64,
        label_fn: F,
    ) -> Result<MaterializedWindow<L>>
    where
        R: BufRead + Seek,
        F: Fn(&Record) -> Result<L>,
    {
        if start >= end {
            return Err(CoordseekError::InvalidWindow { start, end });
        }

        cursor.rewind_for(start);

        let mut labels = Vec::with_capacity((end - start) as usize);
        let mut gap_positions = 0u64;
        let mut resolver_calls = 0u64;
        let mut p = start;

        while p < end {
            resolver_calls += 1;
            match cursor.resolve(p)? {
                Resolution::Hit(hit) => {
                    let (_, record_end) = hit.key;
                    let label = label_fn(&hit.record)?;
                    let to = record_end.min(end);
                    debug_assert!(to > p, "containing interval must extend past the query");
                    labels.resize(labels.len() + (to - p) as usize, label);
                    p = to;
                }
                Resolution::Miss { next_start } => {
                    let to = match next_start {
                        Some(s) if s < end => s,
                        _ => end,
                    };
                    debug_assert!(to > p, "successor start must exceed the query");
                    match &self.policy {
                        GapPolicy::Strict => {
                            return Err(CoordseekError::CoverageGap {
                                chrom: cursor.chrom().to_string(),
                                coord: p,
                            });
                        }
                        GapPolicy::Fill(filler) => {
                            labels.resize(labels.len() + (to - p) as usize, filler.clone());
                            gap_positions += to - p;
                            p = to;
                        }
                    }
                }
            }
        }

        Ok(MaterializedWindow {
            start,
            labels,
            gap_positions,
            resolver_calls,
        })
    }

    /// Materializes `[start, end)` against a point-indexed table.
    ///
    /// Each position is an independent record, so this resolves once per
    /// position; the cursor's hint and cache keep the 1-by-1 scan cheap.
    pub fn points<R, F>(
        &self,
        cursor: &mut IncrementalCursor<PointScheme, R>,
        start: u64,
        end: u64,
        label_fn: F,
    ) -> Result<MaterializedWindow<L>>
    where
        R: BufRead + Seek,
        F: Fn(&Record) -> Result<L>,
    {
        if start >= end {
            return Err(CoordseekError::InvalidWindow { start, end });
        }

        cursor.rewind_for(start);

        let mut labels = Vec::with_capacity((end - start) as usize);
        let mut gap_positions = 0u64;
        let mut resolver_calls = 0u64;

        for coord in start..end {
            resolver_calls += 1;
            match cursor.resolve(coord)? {
                Resolution::Hit(hit) => labels.push(label_fn(&hit.record)?),
                Resolution::Miss { .. } => match &self.policy {
                    GapPolicy::Strict => {
                        return Err(CoordseekError::CoverageGap {
                            chrom: cursor.chrom().to_string(),
                            coord,
                        });
                    }
                    GapPolicy::Fill(filler) => {
                        labels.push(filler.clone());
                        gap_positions += 1;
                    }
                },
            }
        }

        Ok(MaterializedWindow {
            start,
            labels,
            gap_positions,
            resolver_calls,
        })
    }
}
