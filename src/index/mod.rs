//! Byte-offset indexing of sorted record files.
//!
//! Sorted annotation tables (alignment CSVs, conservation-element tables,
//! chromatin-state segmentations) are addressed by byte offset, never by
//! line index. This module provides:
//!
//! - [`FileLayout`] / [`KeyScheme`]: how one table layout splits fields and
//!   orders keys ([`PointScheme`] for point-indexed, [`IntervalScheme`] for
//!   interval-indexed files)
//! - [`SortedFile`]: buffered or memory-mapped random line access
//! - [`SortedFileIndex`]: stateless O(log n) binary search

pub mod key;
pub mod reader;
pub mod search;

pub use key::{Delimiter, FileLayout, IntervalScheme, KeyRelation, KeyScheme, PointScheme, Record};
pub use reader::{SortedFile, MMAP_THRESHOLD};
pub use search::{Hit, SearchOutcome, SortedFileIndex};
