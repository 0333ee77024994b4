//! Sequence provider seam and flank padding.

use crate::error::Result;
use crate::types::GenomicWindow;

/// Provides substrings of chromosome sequence by half-open coordinate
/// range.
///
/// The retrieval core never loads sequence itself; pipelines back this
/// trait with an in-memory map, an indexed FASTA reader, or anything else
/// addressable by `[start, end)`. Implementations clamp `end` to the
/// chromosome length and return the (possibly shorter) available slice;
/// an unknown chromosome is an error.
pub trait SequenceSlice {
    /// Returns the sequence for `[start, end)` on `chrom`, clamped to the
    /// chromosome end.
    fn get_slice(&self, chrom: &str, start: u64, end: u64) -> Result<String>;
}

impl<F> SequenceSlice for F
where
    F: Fn(&str, u64, u64) -> Result<String>,
{
    fn get_slice(&self, chrom: &str, start: u64, end: u64) -> Result<String> {
        self(chrom, start, end)
    }
}

/// Fetches a window's sequence widened by `flank` on each side, padding
/// with `N` where the widened range runs off the chromosome.
///
/// The result always has length `center.length() + 2 * flank`: a window
/// near the origin is front-padded for the unreachable left flank, and a
/// window near the chromosome end is back-padded for whatever the
/// provider could not supply.
///
/// # Examples
///
/// ```
/// use coordseek::io::fetch_padded;
/// use coordseek::GenomicWindow;
///
/// // 10 bp chromosome backed by a closure provider.
/// let chrom = "ACGTACGTAC";
/// let provider = |name: &str, start: u64, end: u64| {
///     assert_eq!(name, "chr1");
///     let end = (end as usize).min(chrom.len());
///     Ok(chrom[start as usize..end].to_string())
/// };
///
/// let window = GenomicWindow::new("chr1".to_string(), 2, 4)?;
/// assert_eq!(fetch_padded(&provider, &window, 3)?, "NACGTACG");
/// # Ok::<(), coordseek::CoordseekError>(())
/// ```
pub fn fetch_padded<S: SequenceSlice>(
    provider: &S,
    center: &GenomicWindow,
    flank: u64,
) -> Result<String> {
    let target_len = (center.length() + 2 * flank) as usize;
    let fetch_start = center.start.saturating_sub(flank);
    let left_pad = (flank - (center.start - fetch_start)) as usize;

    let body = provider.get_slice(&center.chrom, fetch_start, center.end + flank)?;

    let mut sequence = String::with_capacity(target_len);
    for _ in 0..left_pad {
        sequence.push('N');
    }
    sequence.push_str(&body);
    while sequence.len() < target_len {
        sequence.push('N');
    }

    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoordseekError;
    use std::collections::HashMap;

    struct MapProvider {
        chroms: HashMap<String, String>,
    }

    impl MapProvider {
        fn new(pairs: &[(&str, &str)]) -> Self {
            MapProvider {
                chroms: pairs
                    .iter()
                    .map(|(c, s)| (c.to_string(), s.to_string()))
                    .collect(),
            }
        }
    }

    impl SequenceSlice for MapProvider {
        fn get_slice(&self, chrom: &str, start: u64, end: u64) -> Result<String> {
            let sequence = self
                .chroms
                .get(chrom)
                .ok_or_else(|| CoordseekError::UnknownChromosome(chrom.to_string()))?;
            let start = (start as usize).min(sequence.len());
            let end = (end as usize).min(sequence.len());
            Ok(sequence[start..end].to_string())
        }
    }

    fn window(chrom: &str, start: u64, end: u64) -> GenomicWindow {
        GenomicWindow::new(chrom.to_string(), start, end).unwrap()
    }

    #[test]
    fn test_interior_window_no_padding() {
        let provider = MapProvider::new(&[("chr1", "AAACCCGGGTTT")]);
        // Window [4, 8) widened by 2 fetches bytes [2, 10).
        let padded = fetch_padded(&provider, &window("chr1", 4, 8), 2).unwrap();
        assert_eq!(padded, "ACCCGGGT");
    }

    #[test]
    fn test_left_edge_front_padded() {
        let provider = MapProvider::new(&[("chr1", "ACGTACGT")]);
        let padded = fetch_padded(&provider, &window("chr1", 1, 3), 4).unwrap();
        assert_eq!(padded.len(), 10);
        assert!(padded.starts_with("NNNACG"));
    }

    #[test]
    fn test_right_edge_back_padded() {
        let provider = MapProvider::new(&[("chr1", "ACGTACGT")]);
        let padded = fetch_padded(&provider, &window("chr1", 5, 7), 3).unwrap();
        assert_eq!(padded, "GTACGTNN");
    }

    #[test]
    fn test_window_covering_whole_chromosome() {
        let provider = MapProvider::new(&[("chr1", "ACGT")]);
        let padded = fetch_padded(&provider, &window("chr1", 0, 4), 2).unwrap();
        assert_eq!(padded, "NNACGTNN");
    }

    #[test]
    fn test_zero_flank_is_plain_slice() {
        let provider = MapProvider::new(&[("chr1", "ACGTACGT")]);
        let padded = fetch_padded(&provider, &window("chr1", 2, 6), 0).unwrap();
        assert_eq!(padded, "GTAC");
    }

    #[test]
    fn test_unknown_chromosome_propagates() {
        let provider = MapProvider::new(&[("chr1", "ACGT")]);
        let result = fetch_padded(&provider, &window("chrX", 0, 2), 1);
        assert!(matches!(result, Err(CoordseekError::UnknownChromosome(_))));
    }
}
