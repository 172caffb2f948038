// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Counters collected while exploring the combination tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStatistics {
    /// Number of search nodes visited, the root included.
    pub nodes_explored: u64,
    /// Number of candidates rejected because they collided with the partial schedule.
    pub prunings: u64,
    /// Number of complete schedules emitted.
    pub combinations_found: u64,
    /// Deepest subject level reached.
    pub max_depth: usize,
    /// Wall time spent searching.
    pub time_total: std::time::Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn on_node(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        if depth > self.max_depth {
            self.max_depth = depth;
        }
    }

    #[inline(always)]
    pub fn on_prune(&mut self) {
        self.prunings = self.prunings.saturating_add(1);
    }

    #[inline(always)]
    pub fn on_combination_found(&mut self) {
        self.combinations_found = self.combinations_found.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: std::time::Duration) {
        self.time_total = duration;
    }

    /// Folds the counters of an independently explored sub-tree into `self`.
    ///
    /// Counters add up and the maximum depth is kept. Time is left alone since
    /// sub-trees may have been explored concurrently.
    pub fn merge(&mut self, other: &SearchStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add(other.nodes_explored);
        self.prunings = self.prunings.saturating_add(other.prunings);
        self.combinations_found = self
            .combinations_found
            .saturating_add(other.combinations_found);
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Prunings: {}", self.prunings)?;
        writeln!(f, "  Combinations Found: {}", self.combinations_found)?;
        writeln!(f, "  Max Depth: {}", self.max_depth)?;
        writeln!(
            f,
            "  Total Time (secs): {:.3}",
            self.time_total.as_secs_f64()
        )
    }
}
