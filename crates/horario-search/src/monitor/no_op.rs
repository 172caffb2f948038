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

/// A monitor that ignores every event and never stops the search.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOpMonitor;

impl NoOpMonitor {
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl SearchMonitor for NoOpMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOpMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, _groups: &SubjectGroups<'_>) {}

    #[inline(always)]
    fn on_exit_search(&mut self, _statistics: &SearchStatistics) {}

    #[inline(always)]
    fn on_combination_found(&mut self, _combination: &Combination) {}

    #[inline(always)]
    fn on_prune(&mut self, _offering: &Offering, _depth: usize) {}

    #[inline(always)]
    fn on_step(&mut self, _statistics: &SearchStatistics) {}

    #[inline(always)]
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
