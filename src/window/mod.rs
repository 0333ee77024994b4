//! Window materialization: per-position labels with gap filling.
//!
//! A window is a contiguous coordinate range turned into a fixed-length
//! output sequence. [`WindowMaterializer`] drives an
//! [`IncrementalCursor`](crate::cursor::IncrementalCursor) across the range,
//! applies a [`GapPolicy`] to positions no record covers, and exposes both
//! the forward view and a position-reversed, value-mirrored view derived
//! from the same resolution pass.
//!
//! Label encoding is external: the materializer accepts a label function and
//! never embeds a categorical or one-hot scheme.

mod materialize;

pub use materialize::{MaterializedWindow, WindowMaterializer};

/// What to do with positions no record covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GapPolicy<L> {
    /// Label uncovered positions with the designated filler and count them.
    Fill(L),
    /// Treat any uncovered position as
    /// [`CoverageGap`](crate::CoordseekError::CoverageGap) and abort the
    /// window. For tables expected to tile the chromosome completely.
    Strict,
}

/// Watson-Crick complement of a nucleotide character.
///
/// Case is preserved; `N`, `X`, and anything else without a complement pass
/// through unchanged. This is the canonical mirror function for
/// [`MaterializedWindow::reversed_with`] over nucleotide-valued labels.
///
/// # Examples
///
/// ```
/// use coordseek::window::complement_base;
///
/// assert_eq!(complement_base('A'), 'T');
/// assert_eq!(complement_base('g'), 'c');
/// assert_eq!(complement_base('N'), 'N');
/// ```
pub fn complement_base(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement_pairs() {
        for (base, comp) in [('A', 'T'), ('C', 'G'), ('a', 't'), ('c', 'g')] {
            assert_eq!(complement_base(base), comp);
            assert_eq!(complement_base(comp), base);
        }
    }

    #[test]
    fn test_complement_passthrough() {
        for base in ['N', 'n', 'X', 'x', '-'] {
            assert_eq!(complement_base(base), base);
        }
    }

    #[test]
    fn test_complement_involution() {
        for b in "ACGTacgtNnXx".chars() {
            assert_eq!(complement_base(complement_base(b)), b);
        }
    }
}
