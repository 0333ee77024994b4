//! Seekable line-oriented access to sorted annotation files.
//!
//! Binary search and the forward-scanning cursor both need the same two
//! primitives: seek to an arbitrary byte and read the line found there. Small
//! files go through a [`BufReader`]; files at or above [`MMAP_THRESHOLD`] are
//! memory-mapped, which pays off for the multi-gigabyte alignment tables a
//! chromosome pass hammers with repeated seeks.
//!
//! Compressed files cannot be binary-searched (no byte addressing), so
//! [`SortedFile::open`] always operates on uncompressed text.

use crate::error::Result;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Files at or above this size are memory-mapped instead of buffered.
pub const MMAP_THRESHOLD: u64 = 50 * 1024 * 1024; // 50 MB

/// A sorted record file opened for random line access.
pub enum SortedFile {
    /// Buffered file handle, used below [`MMAP_THRESHOLD`].
    Buffered(BufReader<File>),
    /// Memory-mapped file, used at or above [`MMAP_THRESHOLD`].
    Mapped(io::Cursor<Mmap>),
}

impl SortedFile {
    /// Opens a file, choosing buffered or memory-mapped access by size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, stat'ed, or mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        if len >= MMAP_THRESHOLD {
            // Safety: the file is opened read-only and the mapping lives as
            // long as the SortedFile; concurrent truncation is the caller's
            // to avoid, as with any mapped input.
            let mmap = unsafe { Mmap::map(&file)? };
            Ok(SortedFile::Mapped(io::Cursor::new(mmap)))
        } else {
            Ok(SortedFile::Buffered(BufReader::new(file)))
        }
    }

    /// Total file size in bytes.
    pub fn len(&self) -> Result<u64> {
        match self {
            SortedFile::Buffered(reader) => Ok(reader.get_ref().metadata()?.len()),
            SortedFile::Mapped(cursor) => Ok(cursor.get_ref().len() as u64),
        }
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Read for SortedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SortedFile::Buffered(reader) => reader.read(buf),
            SortedFile::Mapped(cursor) => cursor.read(buf),
        }
    }
}

impl BufRead for SortedFile {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SortedFile::Buffered(reader) => reader.fill_buf(),
            SortedFile::Mapped(cursor) => cursor.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SortedFile::Buffered(reader) => reader.consume(amt),
            SortedFile::Mapped(cursor) => cursor.consume(amt),
        }
    }
}

impl Seek for SortedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            SortedFile::Buffered(reader) => reader.seek(pos),
            SortedFile::Mapped(cursor) => cursor.seek(pos),
        }
    }
}

/// Reads the line starting at `offset`.
///
/// Returns the line with its trailing newline stripped, together with the
/// number of bytes the line occupied in the file (newline included), which is
/// what offset arithmetic needs. A zero byte count means end of file.
pub(crate) fn read_line_at<R: BufRead + Seek>(
    reader: &mut R,
    offset: u64,
) -> io::Result<(String, u64)> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut buf = Vec::new();
    let bytes = reader.read_until(b'\n', &mut buf)? as u64;

    while buf.last() == Some(&b'\n') || buf.last() == Some(&b'\r') {
        buf.pop();
    }

    Ok((String::from_utf8_lossy(&buf).into_owned(), bytes))
}
