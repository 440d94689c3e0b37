//! Where generation summaries go.

use std::collections::VecDeque;

use super::driver::GenerationStats;

/// Maximum summaries kept by `StatsLog`
pub const MAX_LOG_ENTRIES: usize = 50;

/// What produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsOrigin {
    /// Natural boundary reached during the given frame (1-based)
    Frame(u64),
    /// Manual trigger
    Manual,
}

/// Receives one line per completed generation.
pub trait StatsSink {
    fn emit(&mut self, origin: StatsOrigin, stats: &GenerationStats);
}

impl<S: StatsSink + ?Sized> StatsSink for &mut S {
    fn emit(&mut self, origin: StatsOrigin, stats: &GenerationStats) {
        (**self).emit(origin, stats)
    }
}

impl<A: StatsSink, B: StatsSink> StatsSink for (A, B) {
    fn emit(&mut self, origin: StatsOrigin, stats: &GenerationStats) {
        self.0.emit(origin, stats);
        self.1.emit(origin, stats);
    }
}

/// Writes each summary to the tracing output at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatsSink for TracingSink {
    fn emit(&mut self, origin: StatsOrigin, stats: &GenerationStats) {
        match origin {
            StatsOrigin::Frame(frame) => tracing::info!(frame, "{}", stats),
            StatsOrigin::Manual => tracing::info!(forced = true, "{}", stats),
        }
    }
}

/// Bounded history of recent summaries.
#[derive(Debug, Clone)]
pub struct StatsLog {
    entries: VecDeque<(StatsOrigin, GenerationStats)>,
    capacity: usize,
    total: u64,
}

impl Default for StatsLog {
    fn default() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }
}

impl StatsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &(StatsOrigin, GenerationStats)> {
        self.entries.iter()
    }

    /// Formatted lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(|(_, stats)| stats.to_string()).collect()
    }

    pub fn latest(&self) -> Option<&GenerationStats> {
        self.entries.back().map(|(_, stats)| stats)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summaries received since creation, including evicted ones.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl StatsSink for StatsLog {
    fn emit(&mut self, origin: StatsOrigin, stats: &GenerationStats) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((origin, *stats));
        self.total += 1;
    }
}
