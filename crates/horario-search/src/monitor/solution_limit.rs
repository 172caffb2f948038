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
use std::sync::atomic::{AtomicU64, Ordering};

/// Stops the search once a number of schedules has been found.
///
/// The count lives in an atomic shared by reference, so several monitors
/// (one per worker thread) can enforce a single global limit. Workers that
/// find schedules concurrently may overshoot the limit by a few; callers
/// that need an exact count truncate the merged result.
#[derive(Debug)]
pub struct SolutionLimitMonitor<'a> {
    solutions_found: &'a AtomicU64,
    solution_limit: u64,
}

impl<'a> SolutionLimitMonitor<'a> {
    #[inline]
    pub fn new(solutions_found: &'a AtomicU64, solution_limit: u64) -> Self {
        Self {
            solutions_found,
            solution_limit,
        }
    }

    #[inline]
    fn reached_limit(&self) -> bool {
        self.solutions_found.load(Ordering::Relaxed) >= self.solution_limit
    }
}

impl SearchMonitor for SolutionLimitMonitor<'_> {
    fn name(&self) -> &str {
        "SolutionLimitMonitor"
    }

    fn on_enter_search(&mut self, _groups: &SubjectGroups<'_>) {}

    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}

    fn on_combination_found(&mut self, _combination: &Combination) {
        self.solutions_found.fetch_add(1, Ordering::Relaxed);
    }

    fn on_prune(&mut self, _offering: &Offering, _depth: usize) {}

    fn on_step(&mut self, _statistics: &SearchStatistics) {}

    fn search_command(&self) -> SearchCommand {
        if self.reached_limit() {
            SearchCommand::Terminate("solution limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}
