//! Genomic coordinate types shared across the crate.
//!
//! All coordinates are **0-based, half-open** `[start, end)`:
//! - Start position is inclusive (0-based)
//! - End position is exclusive
//! - Length = end - start
//!
//! This matches the BED format and is standard in bioinformatics.
//!
//! # Examples
//!
//! ```
//! use coordseek::GenomicWindow;
//!
//! let window = GenomicWindow::new("chr1".to_string(), 100, 300)?;
//! assert_eq!(window.length(), 200);
//!
//! // Widen symmetrically, as windowed scan pipelines do around a peak center
//! let widened = window.with_flank(400);
//! assert_eq!(widened.start, 0);   // saturates at the chromosome origin
//! assert_eq!(widened.end, 700);
//! # Ok::<(), coordseek::CoordseekError>(())
//! ```

use crate::error::{CoordseekError, Result};
use std::fmt;
use std::str::FromStr;

/// A coordinate window to be materialized into a fixed-length output.
///
/// # Invariants
///
/// - `start < end` (enforced by constructor)
///
/// # Examples
///
/// ```
/// use coordseek::GenomicWindow;
///
/// let window = GenomicWindow::new("chr1".to_string(), 100, 200)?;
/// assert_eq!(window.length(), 100);
///
/// // Invalid window (start >= end)
/// assert!(GenomicWindow::new("chr1".to_string(), 200, 100).is_err());
/// # Ok::<(), coordseek::CoordseekError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicWindow {
    /// Chromosome or contig name.
    pub chrom: String,

    /// Start position (0-based, inclusive).
    pub start: u64,

    /// End position (0-based, exclusive).
    pub end: u64,
}

impl GenomicWindow {
    /// Creates a new window.
    ///
    /// # Errors
    ///
    /// Returns [`CoordseekError::InvalidWindow`] if `start >= end`.
    pub fn new(chrom: String, start: u64, end: u64) -> Result<Self> {
        if start >= end {
            return Err(CoordseekError::InvalidWindow { start, end });
        }

        Ok(GenomicWindow { chrom, start, end })
    }

    /// Returns the number of positions in this window.
    #[inline]
    pub fn length(&self) -> u64 {
        self.end - self.start
    }

    /// Checks whether this window overlaps another on the same chromosome.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.chrom == other.chrom && self.start < other.end && other.start < self.end
    }

    /// Widens the window by `flank` positions on each side.
    ///
    /// The start saturates at the chromosome origin; callers that need a
    /// fixed output length are responsible for padding short sequence
    /// slices at boundaries (see [`crate::io::fetch_padded`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use coordseek::GenomicWindow;
    ///
    /// let peak = GenomicWindow::new("chr8".to_string(), 1000, 1200)?;
    /// let widened = peak.with_flank(400);
    /// assert_eq!((widened.start, widened.end), (600, 1600));
    /// # Ok::<(), coordseek::CoordseekError>(())
    /// ```
    pub fn with_flank(&self, flank: u64) -> Self {
        GenomicWindow {
            chrom: self.chrom.clone(),
            start: self.start.saturating_sub(flank),
            end: self.end + flank,
        }
    }
}

impl fmt::Display for GenomicWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// DNA strand orientation.
///
/// Selects between the forward view of a materialized window and the
/// position-reversed, value-mirrored view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    /// Plus strand (+)
    Forward,

    /// Minus strand (-)
    Reverse,
}

impl FromStr for Strand {
    type Err = CoordseekError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(CoordseekError::MalformedWindow {
                line_number: 0,
                line: s.to_string(),
                reason: "strand must be '+' or '-'".to_string(),
            }),
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_new() {
        let window = GenomicWindow::new("chr1".to_string(), 100, 200).unwrap();
        assert_eq!(window.chrom, "chr1");
        assert_eq!(window.start, 100);
        assert_eq!(window.end, 200);
    }

    #[test]
    fn test_window_invalid() {
        assert!(GenomicWindow::new("chr1".to_string(), 100, 100).is_err());
        assert!(GenomicWindow::new("chr1".to_string(), 200, 100).is_err());
    }

    #[test]
    fn test_window_length() {
        let window = GenomicWindow::new("chr1".to_string(), 100, 250).unwrap();
        assert_eq!(window.length(), 150);
    }

    #[test]
    fn test_window_overlaps() {
        let a = GenomicWindow::new("chr1".to_string(), 100, 200).unwrap();
        let b = GenomicWindow::new("chr1".to_string(), 150, 250).unwrap();
        let c = GenomicWindow::new("chr1".to_string(), 300, 400).unwrap();
        let d = GenomicWindow::new("chr2".to_string(), 100, 200).unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_with_flank_saturates_at_origin() {
        let window = GenomicWindow::new("chr1".to_string(), 100, 300).unwrap();
        let widened = window.with_flank(400);
        assert_eq!(widened.start, 0);
        assert_eq!(widened.end, 700);
    }

    #[test]
    fn test_with_flank_interior() {
        let window = GenomicWindow::new("chr2".to_string(), 1000, 1200).unwrap();
        let widened = window.with_flank(400);
        assert_eq!(widened.start, 600);
        assert_eq!(widened.end, 1600);
        assert_eq!(widened.length(), 1000);
    }

    #[test]
    fn test_strand_round_trip() {
        assert_eq!("+".parse::<Strand>().unwrap(), Strand::Forward);
        assert_eq!("-".parse::<Strand>().unwrap(), Strand::Reverse);
        assert!("?".parse::<Strand>().is_err());
        assert_eq!(Strand::Forward.to_string(), "+");
        assert_eq!(Strand::Reverse.to_string(), "-");
    }

    #[test]
    fn test_window_display() {
        let window = GenomicWindow::new("chr1".to_string(), 100, 200).unwrap();
        assert_eq!(window.to_string(), "chr1:100-200");
    }
}
