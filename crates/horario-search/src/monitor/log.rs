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

use crate::{
    combination::Combination,
    group::SubjectGroups,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    stats::SearchStatistics,
};
use horario_model::offering::Offering;
use std::time::{Duration, Instant};

/// Emits periodic progress lines through `tracing` at `info` level.
///
/// Like `TimeLimitMonitor`, the clock is only read when
/// `nodes_explored & clock_check_mask == 0`.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    lines_logged: u64,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            lines_logged: 0,
        }
    }

    /// Returns how many progress lines were emitted in the current search.
    #[inline]
    pub fn lines_logged(&self) -> u64 {
        self.lines_logged
    }

    fn log_line(&mut self, statistics: &SearchStatistics) {
        let now = Instant::now();
        tracing::info!(
            elapsed_secs = now.duration_since(self.start_time).as_secs_f64(),
            nodes = statistics.nodes_explored,
            depth = statistics.max_depth,
            found = statistics.combinations_found,
            pruned = statistics.prunings,
            "search progress"
        );
        self.last_log_time = now;
        self.lines_logged += 1;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self, groups: &SubjectGroups<'_>) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.lines_logged = 0;
        tracing::info!(
            subjects = groups.len(),
            upper_bound = groups.product_size(),
            "search started"
        );
    }

    fn on_exit_search(&mut self, statistics: &SearchStatistics) {
        tracing::info!(
            elapsed_secs = self.start_time.elapsed().as_secs_f64(),
            nodes = statistics.nodes_explored,
            found = statistics.combinations_found,
            pruned = statistics.prunings,
            "search finished"
        );
    }

    fn on_combination_found(&mut self, _combination: &Combination) {}

    fn on_prune(&mut self, _offering: &Offering, _depth: usize) {}

    fn on_step(&mut self, statistics: &SearchStatistics) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(statistics);
        }
    }

    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
