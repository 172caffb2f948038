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

/// Summary of one end-to-end solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Number of candidates per wanted subject after filtering, in request order.
    pub candidates: Vec<(String, usize)>,
    /// Schedules produced by the search, before the allowlists were applied.
    pub combinations_searched: u64,
    /// Schedules left after the allowlists.
    pub schedules: u64,
    /// Nodes visited by the search.
    pub nodes_explored: u64,
    /// Candidates pruned by the search.
    pub prunings: u64,
    /// Number of worker threads the search ran on.
    pub used_threads: usize,
    /// Wall time of the whole solve.
    pub solve_duration: std::time::Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        for (subject, count) in &self.candidates {
            writeln!(f, "  Candidates [{}]: {}", subject, count)?;
        }
        writeln!(f, "  Combinations Searched: {}", self.combinations_searched)?;
        writeln!(f, "  Schedules: {}", self.schedules)?;
        writeln!(f, "  Nodes Explored: {}", self.nodes_explored)?;
        writeln!(f, "  Prunings: {}", self.prunings)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    candidates: Vec<(String, usize)>,
    combinations_searched: u64,
    schedules: u64,
    nodes_explored: u64,
    prunings: u64,
    used_threads: usize,
    solve_duration: std::time::Duration,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            combinations_searched: 0,
            schedules: 0,
            nodes_explored: 0,
            prunings: 0,
            used_threads: 1,
            solve_duration: std::time::Duration::ZERO,
        }
    }

    #[inline]
    pub fn candidates(mut self, candidates: Vec<(String, usize)>) -> Self {
        self.candidates = candidates;
        self
    }

    #[inline]
    pub fn combinations_searched(mut self, combinations_searched: u64) -> Self {
        self.combinations_searched = combinations_searched;
        self
    }

    #[inline]
    pub fn schedules(mut self, schedules: u64) -> Self {
        self.schedules = schedules;
        self
    }

    #[inline]
    pub fn nodes_explored(mut self, nodes_explored: u64) -> Self {
        self.nodes_explored = nodes_explored;
        self
    }

    #[inline]
    pub fn prunings(mut self, prunings: u64) -> Self {
        self.prunings = prunings;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: std::time::Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        SolverStatistics {
            candidates: self.candidates,
            combinations_searched: self.combinations_searched,
            schedules: self.schedules,
            nodes_explored: self.nodes_explored,
            prunings: self.prunings,
            used_threads: self.used_threads,
            solve_duration: self.solve_duration,
        }
    }
}
