//! Per-chromosome pass driving.
//!
//! A pass joins an ordered stream of coordinate windows against one
//! annotation table per chromosome. Each chromosome owns exactly one
//! cursor/cache/file triple for the whole pass; the triple is created when
//! the chromosome's first window arrives and released when its last window
//! is done. Forward-only scanning assumes exclusive, strictly ordered
//! access, so a single chromosome's stream is never fanned out across
//! threads; distinct chromosomes share nothing and may run in parallel.
//!
//! The driver is agnostic to cursor and label types: callers supply an
//! opener, a materialize step, and a sink factory.
//!
//! # Examples
//!
//! ```no_run
//! use coordseek::cursor::IncrementalCursor;
//! use coordseek::index::{FileLayout, IntervalScheme};
//! use coordseek::pass::{group_by_chromosome, run_pass};
//! use coordseek::window::{GapPolicy, MaterializedWindow, WindowMaterializer};
//! use coordseek::{GenomicWindow, Result};
//!
//! # fn main() -> Result<()> {
//! let windows = vec![
//!     GenomicWindow::new("chr1".to_string(), 1000, 2000)?,
//!     GenomicWindow::new("chr2".to_string(), 500, 1500)?,
//! ];
//! let materializer = WindowMaterializer::new(GapPolicy::Fill("NA".to_string()));
//!
//! let summary = run_pass(
//!     group_by_chromosome(windows),
//!     |chrom| {
//!         IncrementalCursor::open(
//!             format!("{}_segmentation.bed", chrom),
//!             chrom,
//!             FileLayout::interval_bed(),
//!             IntervalScheme::bed(),
//!         )
//!     },
//!     |cursor, window| {
//!         materializer.intervals(cursor, window.start, window.end, |record| {
//!             Ok(record.line.split_whitespace().last().unwrap_or("?").to_string())
//!         })
//!     },
//!     |_chrom| Ok(|_: &str, _: &MaterializedWindow<String>| -> Result<()> { Ok(()) }),
//! )?;
//! println!("{} windows, {} gap positions", summary.windows, summary.gap_positions);
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::types::GenomicWindow;
use crate::window::MaterializedWindow;
use rayon::prelude::*;
use std::collections::HashMap;

/// Receives materialized windows for persistence.
///
/// The core never touches the storage format; implementors append the
/// fixed-length label sequences to whatever tabular or tensor store the
/// pipeline uses.
pub trait WindowSink<L> {
    /// Accepts one materialized window for the given chromosome.
    fn accept(&mut self, chrom: &str, window: &MaterializedWindow<L>) -> Result<()>;
}

impl<L, F> WindowSink<L> for F
where
    F: FnMut(&str, &MaterializedWindow<L>) -> Result<()>,
{
    fn accept(&mut self, chrom: &str, window: &MaterializedWindow<L>) -> Result<()> {
        self(chrom, window)
    }
}

/// Aggregate accounting for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Windows materialized.
    pub windows: u64,
    /// Total positions labeled.
    pub positions: u64,
    /// Positions that received the gap filler, summed across windows.
    pub gap_positions: u64,
}

impl PassSummary {
    fn record<L>(&mut self, window: &MaterializedWindow<L>) {
        self.windows += 1;
        self.positions += window.len() as u64;
        self.gap_positions += window.gap_positions();
    }

    fn merge(mut self, other: PassSummary) -> PassSummary {
        self.windows += other.windows;
        self.positions += other.positions;
        self.gap_positions += other.gap_positions;
        self
    }
}

/// Partitions an ordered window stream into per-chromosome runs.
///
/// Chromosomes appear in first-appearance order; windows keep their
/// original per-chromosome order (window sources are non-decreasing per
/// chromosome, which the cursor's ordering rules rely on).
pub fn group_by_chromosome(
    windows: impl IntoIterator<Item = GenomicWindow>,
) -> Vec<(String, Vec<GenomicWindow>)> {
    let mut groups: Vec<(String, Vec<GenomicWindow>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for window in windows {
        match index.get(&window.chrom) {
            Some(&i) => groups[i].1.push(window),
            None => {
                index.insert(window.chrom.clone(), groups.len());
                let chrom = window.chrom.clone();
                groups.push((chrom, vec![window]));
            }
        }
    }

    groups
}

fn run_chromosome<C, L, K, M>(
    chrom: &str,
    windows: &[GenomicWindow],
    cursor: &mut C,
    sink: &mut K,
    materialize: &M,
) -> Result<PassSummary>
where
    K: WindowSink<L>,
    M: Fn(&mut C, &GenomicWindow) -> Result<MaterializedWindow<L>>,
{
    let mut summary = PassSummary::default();
    for window in windows {
        let materialized = materialize(cursor, window)?;
        sink.accept(chrom, &materialized)?;
        summary.record(&materialized);
    }
    Ok(summary)
}

/// Runs a pass serially, one chromosome after the next.
///
/// Each chromosome's cursor and sink are created on entry and dropped on
/// exit (or on the first error), releasing file handles and cache memory
/// deterministically.
pub fn run_pass<C, L, K>(
    groups: Vec<(String, Vec<GenomicWindow>)>,
    open_cursor: impl Fn(&str) -> Result<C>,
    materialize: impl Fn(&mut C, &GenomicWindow) -> Result<MaterializedWindow<L>>,
    open_sink: impl Fn(&str) -> Result<K>,
) -> Result<PassSummary>
where
    K: WindowSink<L>,
{
    let mut summary = PassSummary::default();
    for (chrom, windows) in &groups {
        let mut cursor = open_cursor(chrom)?;
        let mut sink = open_sink(chrom)?;
        summary = summary.merge(run_chromosome(
            chrom,
            windows,
            &mut cursor,
            &mut sink,
            &materialize,
        )?);
    }
    Ok(summary)
}

/// Runs a pass with chromosomes processed in parallel.
///
/// Parallelism is across chromosomes only: each worker owns its
/// chromosome's cursor triple and sink, and windows within a chromosome
/// stay in order. The first error aborts the pass.
pub fn run_pass_parallel<C, L, K>(
    groups: Vec<(String, Vec<GenomicWindow>)>,
    open_cursor: impl Fn(&str) -> Result<C> + Sync,
    materialize: impl Fn(&mut C, &GenomicWindow) -> Result<MaterializedWindow<L>> + Sync,
    open_sink: impl Fn(&str) -> Result<K> + Sync,
) -> Result<PassSummary>
where
    K: WindowSink<L>,
{
    let summaries: Vec<PassSummary> = groups
        .par_iter()
        .map(|(chrom, windows)| {
            let mut cursor = open_cursor(chrom)?;
            let mut sink = open_sink(chrom)?;
            run_chromosome(chrom, windows, &mut cursor, &mut sink, &materialize)
        })
        .collect::<Result<_>>()?;

    Ok(summaries
        .into_iter()
        .fold(PassSummary::default(), PassSummary::merge))
}
