//! Histogram equalization stages.
//!
//! `accumulate` -> `cdf` -> `mapping` -> `apply`, with `chart` rendering any
//! histogram for inspection. Every value here is recomputed per call; nothing
//! is cached between runs.

pub mod accumulate;
pub mod apply;
pub mod cdf;
pub mod chart;
pub mod mapping;

pub use accumulate::*;
pub use apply::*;
pub use cdf::*;
pub use chart::*;
pub use mapping::*;

/// Number of intensity levels in an 8-bit channel.
pub const LEVELS: usize = 256;

/// Occurrence count per intensity level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; LEVELS],
}

impl Histogram {
    pub fn new() -> Self {
        Self { counts: [0; LEVELS] }
    }

    pub fn from_counts(counts: [u64; LEVELS]) -> Self {
        Self { counts }
    }

    pub fn counts(&self) -> &[u64; LEVELS] {
        &self.counts
    }

    pub fn get(&self, level: u8) -> u64 {
        self.counts[level as usize]
    }

    /// Tally every sample in `samples`.
    pub fn record_all(&mut self, samples: &[u8]) {
        for &sample in samples {
            self.counts[sample as usize] += 1;
        }
    }

    /// Element-wise sum of `other` into `self`.
    pub fn merge(&mut self, other: &Histogram) {
        for (count, &extra) in self.counts.iter_mut().zip(other.counts.iter()) {
            *count += extra;
        }
    }

    /// Number of samples tallied.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
