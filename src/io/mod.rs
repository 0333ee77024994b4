//! Input collaborators: window lists and sequence providers.
//!
//! The retrieval core consumes coordinate windows and, for
//! sequence-centric pipelines, flanked slices of chromosome sequence.
//! This module supplies both seams: [`WindowSource`] streams `chrom start
//! end` records from plain or gzip-compressed text, and [`SequenceSlice`]
//! abstracts over whatever holds the actual base strings so the core
//! never loads a chromosome itself.

mod slice;
mod windows;

pub use slice::{fetch_padded, SequenceSlice};
pub use windows::WindowSource;
