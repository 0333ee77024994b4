//! Streaming reader for window list files.

use crate::error::{CoordseekError, Result};
use crate::types::GenomicWindow;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Streams [`GenomicWindow`]s from whitespace-delimited text.
///
/// Each record line holds `chrom start end`; extra trailing fields are
/// ignored so BED files with name/score columns pass through unchanged.
/// Blank lines and lines starting with `#` are skipped. Lines that fail
/// to parse yield [`CoordseekError::MalformedWindow`] with the 1-based
/// line number, and iteration continues past them so callers choose
/// whether a bad line is fatal.
///
/// # Examples
///
/// ```
/// use coordseek::io::WindowSource;
///
/// let text = "# peaks\nchr1\t100\t200\nchr1\t300\t400\tpeak_2\t955\n";
/// let windows: Vec<_> = WindowSource::new(text.as_bytes())
///     .collect::<Result<_, _>>()?;
/// assert_eq!(windows.len(), 2);
/// assert_eq!(windows[1].start, 300);
/// # Ok::<(), coordseek::CoordseekError>(())
/// ```
pub struct WindowSource<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
}

impl WindowSource<File> {
    /// Opens an uncompressed window list file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(WindowSource::new(File::open(path)?))
    }
}

impl WindowSource<MultiGzDecoder<File>> {
    /// Opens a gzip-compressed window list file.
    pub fn from_gzip_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(WindowSource::new(MultiGzDecoder::new(File::open(path)?)))
    }
}

impl<R: Read> WindowSource<R> {
    /// Wraps any reader producing window list text.
    pub fn new(reader: R) -> Self {
        WindowSource {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    fn parse_line(&self, line: &str) -> Result<GenomicWindow> {
        let malformed = |reason: &str| CoordseekError::MalformedWindow {
            line_number: self.line_number,
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = line.split_whitespace();
        let chrom = fields.next().ok_or_else(|| malformed("empty record"))?;
        let start = fields
            .next()
            .ok_or_else(|| malformed("missing start field"))?
            .parse::<u64>()
            .map_err(|_| malformed("start is not an integer"))?;
        let end = fields
            .next()
            .ok_or_else(|| malformed("missing end field"))?
            .parse::<u64>()
            .map_err(|_| malformed("end is not an integer"))?;

        GenomicWindow::new(chrom.to_string(), start, end)
            .map_err(|_| malformed("start must be less than end"))
    }
}

impl<R: Read> Iterator for WindowSource<R> {
    type Item = Result<GenomicWindow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(self.parse_line(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoordseekError;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parses_basic_records() {
        let text = "chr1\t0\t100\nchr2 250 500\n";
        let windows: Vec<GenomicWindow> = WindowSource::new(text.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].chrom, "chr1");
        assert_eq!(windows[1].start, 250);
        assert_eq!(windows[1].end, 500);
    }

    #[test]
    fn test_skips_comments_and_blanks() {
        let text = "# header\n\nchr1\t10\t20\n   \n# trailing comment\n";
        let windows: Vec<GenomicWindow> = WindowSource::new(text.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_extra_columns_ignored() {
        let text = "chr1\t10\t20\tpeak_1\t800\t+\n";
        let windows: Vec<GenomicWindow> = WindowSource::new(text.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(windows[0].end, 20);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let text = "chr1\t10\t20\nchr1\tten\t30\nchr1\t40\t50\n";
        let results: Vec<Result<GenomicWindow>> = WindowSource::new(text.as_bytes()).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(CoordseekError::MalformedWindow { line_number, .. }) => {
                assert_eq!(*line_number, 2);
            }
            other => panic!("expected MalformedWindow, got {:?}", other),
        }
        // Iteration continues past the bad line.
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let results: Vec<_> = WindowSource::new("chr1\t30\t30\n".as_bytes()).collect();
        assert!(matches!(
            results[0],
            Err(CoordseekError::MalformedWindow { .. })
        ));
    }

    #[test]
    fn test_from_gzip_path() {
        let file = NamedTempFile::new().unwrap();
        let mut encoder = GzEncoder::new(
            std::fs::File::create(file.path()).unwrap(),
            Compression::default(),
        );
        encoder.write_all(b"chr7\t1000\t2000\n").unwrap();
        encoder.finish().unwrap();

        let windows: Vec<GenomicWindow> = WindowSource::from_gzip_path(file.path())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(windows, vec![GenomicWindow::new("chr7".to_string(), 1000, 2000).unwrap()]);
    }
}
