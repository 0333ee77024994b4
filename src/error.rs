//! Error types for coordseek

use thiserror::Error;

/// Result type alias for coordseek operations
pub type Result<T> = std::result::Result<T, CoordseekError>;

/// Error types that can occur in coordseek
#[derive(Debug, Error)]
pub enum CoordseekError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line failed to parse its key while the file was not exhausted.
    ///
    /// Binary search cannot proceed over structurally inconsistent data,
    /// so this aborts the enclosing chromosome pass.
    #[error("Malformed record in {chrom} at byte {offset}: {reason} (line: {line:?})")]
    MalformedRecord {
        /// Chromosome whose annotation file contained the record
        chrom: String,
        /// Byte offset of the offending line's first character
        offset: u64,
        /// The offending line, newline stripped
        line: String,
        /// What failed to parse or which invariant broke
        reason: String,
    },

    /// A coordinate-window input line could not be parsed
    #[error("Malformed window at line {line_number}: {reason} (line: {line:?})")]
    MalformedWindow {
        /// 1-based line number in the window source
        line_number: usize,
        /// The offending line
        line: String,
        /// What failed to parse
        reason: String,
    },

    /// A query went backward while a forward-scan hint was active
    #[error("Out-of-order query on {chrom}: {query} after {last} (rewind the cursor for backward access)")]
    OutOfOrderQuery {
        /// Chromosome the cursor is bound to
        chrom: String,
        /// Last resolved query coordinate
        last: u64,
        /// The offending (smaller) query coordinate
        query: u64,
    },

    /// A position had no covering record under `GapPolicy::Strict`
    #[error("No record covers {chrom}:{coord}")]
    CoverageGap {
        /// Chromosome being materialized
        chrom: String,
        /// First uncovered coordinate
        coord: u64,
    },

    /// Invalid window coordinates (start >= end)
    #[error("Invalid window: start {start} >= end {end}")]
    InvalidWindow {
        /// Start position
        start: u64,
        /// End position
        end: u64,
    },

    /// A chromosome had no registered annotation file or sequence
    #[error("Unknown chromosome: {0}")]
    UnknownChromosome(String),
}
