//! Per-run statistics counters.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for the final build report.
///
/// Written by whichever stage is currently executing; reads happen after
/// the run, so relaxed ordering is sufficient.
#[derive(Debug, Default)]
pub struct BuildStats {
    pub markup: AtomicUsize,
    pub styles: AtomicUsize,
    pub scripts: AtomicUsize,
    pub images: AtomicUsize,
    /// Files copied verbatim (unsupported or failed image codecs).
    pub copied: AtomicUsize,
    /// References embedded into markup.
    pub inlined: AtomicUsize,
    /// Compressed sibling files written.
    pub compressed: AtomicUsize,
    /// Per-file failures that were recovered (skip or verbatim fallback).
    pub warnings: AtomicUsize,
}

impl BuildStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn inc(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(counter: &AtomicUsize, n: usize) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::Relaxed)
    }
}
