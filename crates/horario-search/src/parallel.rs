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

//! # Parallel Combination Search
//!
//! Runs the sequential engine on independent sub-trees in scoped worker
//! threads. Each candidate of the first subject group roots one sub-tree;
//! workers pull sub-tree roots from a shared counter until none are left.
//!
//! Sub-tree results are stitched back together in candidate order, so an
//! exhausted parallel search returns exactly the list the sequential engine
//! would return. With a solution limit, sub-trees that were cut short by the
//! stop flag or never started are explored again in candidate order until
//! the limit is met, so the kept schedules are the first ones the
//! sequential engine would find.
//!
//! Each worker gets its own monitor stack: an `InterruptMonitor` on a shared
//! stop flag, a `SolutionLimitMonitor` on a shared counter when a limit is
//! set, a `TimeLimitMonitor` when a budget is set, and optionally a
//! `LogMonitor`. The first worker to abort raises the stop flag so that its
//! siblings wind down, and its reason becomes the reason of the whole run.

use crate::{
    combination::Combination,
    engine::CombinationSearch,
    group::SubjectGroups,
    monitor::{
        composite::CompositeMonitor, interrupt::InterruptMonitor, log::LogMonitor,
        search_monitor::SearchMonitor, solution_limit::SolutionLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
    result::{SearchOutcome, TerminationReason},
    stats::SearchStatistics,
};
use horario_model::{index::SubjectIndex, offering::Offering};
use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        OnceLock,
    },
    time::{Duration, Instant},
};

/// Multi-threaded front end of [`CombinationSearch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelCombinationSearch {
    threads: usize,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    log_interval: Option<Duration>,
}

impl Default for ParallelCombinationSearch {
    fn default() -> Self {
        Self::new(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        )
    }
}

/// What one worker produced for one sub-tree root.
struct SubtreeResult {
    root: usize,
    complete: bool,
    combinations: Vec<Combination>,
    statistics: SearchStatistics,
}

impl ParallelCombinationSearch {
    /// Creates a search running on `threads` workers. Zero is treated as one.
    #[inline]
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            solution_limit: None,
            time_limit: None,
            log_interval: None,
        }
    }

    #[inline]
    pub fn with_solution_limit(mut self, limit: u64) -> Self {
        self.solution_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    #[inline]
    pub fn with_progress_log(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Enumerates every schedule of `groups` on the worker pool.
    ///
    /// With a solution limit, the result holds the same schedules in the same
    /// order as a sequential search stopped by a `SolutionLimitMonitor`.
    pub fn search(&self, groups: &SubjectGroups<'_>) -> SearchOutcome {
        let start_time = Instant::now();

        // Nothing to split: the sequential engine covers these cases exactly.
        let roots = match groups.iter().next() {
            Some(first) if groups.first_empty().is_none() => first.candidates(),
            _ => return self.search_sequential(groups),
        };

        let workers = self.threads.min(roots.len());
        tracing::debug!(workers, roots = roots.len(), "starting parallel combination search");

        let next_root = AtomicUsize::new(0);
        let stop = AtomicBool::new(false);
        let solutions = AtomicU64::new(0);
        let abort_reason: OnceLock<String> = OnceLock::new();

        let mut results: Vec<SubtreeResult> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let next_root = &next_root;
                    let stop = &stop;
                    let solutions = &solutions;
                    let abort_reason = &abort_reason;
                    scope.spawn(move || {
                        let _span = tracing::debug_span!("worker", id = worker).entered();
                        let mut monitor = self.worker_monitor(stop, solutions);
                        let engine = CombinationSearch::new(groups);
                        let mut produced = Vec::new();

                        monitor.on_enter_search(groups);
                        let mut worker_stats = SearchStatistics::new();
                        loop {
                            let root = next_root.fetch_add(1, Ordering::Relaxed);
                            if root >= roots.len() || stop.load(Ordering::Relaxed) {
                                break;
                            }
                            let seed = Combination::new().extended(roots[root]);
                            let outcome = engine.explore(SubjectIndex::new(1), seed, &mut monitor);
                            let (combinations, reason, statistics) = outcome.into_parts();
                            worker_stats.merge(&statistics);
                            produced.push(SubtreeResult {
                                root,
                                complete: matches!(reason, TerminationReason::Exhausted),
                                combinations,
                                statistics,
                            });
                            if let TerminationReason::Aborted(reason) = reason {
                                // Only the first abort is the cause; the rest follow the stop flag.
                                if !stop.swap(true, Ordering::Relaxed) {
                                    let _ = abort_reason.set(reason);
                                }
                                break;
                            }
                        }
                        monitor.on_exit_search(&worker_stats);
                        produced
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });

        results.sort_by_key(|r| r.root);

        let mut statistics = SearchStatistics::new();
        // The root node is shared by all sub-trees.
        statistics.on_node(0);

        let (combinations, abort_reason) = match self.solution_limit {
            Some(limit) => {
                self.merge_limited(groups, roots, results, limit, start_time, &mut statistics)
            }
            None => {
                let mut combinations = Vec::new();
                for result in results {
                    statistics.merge(&result.statistics);
                    combinations.extend(result.combinations);
                }
                (combinations, abort_reason.into_inner())
            }
        };
        statistics.set_total_time(start_time.elapsed());

        match abort_reason {
            Some(reason) => SearchOutcome::aborted(combinations, reason, statistics),
            None => SearchOutcome::exhausted(combinations, statistics),
        }
    }

    /// Assembles the first `limit` schedules in candidate order.
    ///
    /// Finished sub-trees are taken as they are. The first sub-tree that is
    /// missing or was cut short is explored again on this thread with the
    /// remaining budget, and so on until the limit is met or the roots run out.
    fn merge_limited(
        &self,
        groups: &SubjectGroups<'_>,
        roots: &[&Offering],
        results: Vec<SubtreeResult>,
        limit: u64,
        start_time: Instant,
        statistics: &mut SearchStatistics,
    ) -> (Vec<Combination>, Option<String>) {
        let limit_len = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut finished: Vec<Option<Vec<Combination>>> =
            std::iter::repeat_with(|| None).take(roots.len()).collect();
        for result in results {
            statistics.merge(&result.statistics);
            if result.complete {
                finished[result.root] = Some(result.combinations);
            }
        }

        let engine = CombinationSearch::new(groups);
        let mut combinations = Vec::new();
        let mut abort_reason = None;
        for (root, subtree) in finished.into_iter().enumerate() {
            if combinations.len() >= limit_len {
                abort_reason = Some("solution limit reached".to_string());
                break;
            }
            match subtree {
                Some(found) => combinations.extend(found),
                None => {
                    tracing::trace!(root, "re-exploring unfinished sub-tree");
                    let stop = AtomicBool::new(false);
                    let solutions = AtomicU64::new(combinations.len() as u64);
                    let remaining = self
                        .time_limit
                        .map(|budget| budget.saturating_sub(start_time.elapsed()));
                    let mut monitor = self.monitor_stack(&stop, &solutions, remaining, None);
                    let seed = Combination::new().extended(roots[root]);
                    let (found, reason, stats) = engine
                        .explore(SubjectIndex::new(1), seed, &mut monitor)
                        .into_parts();
                    statistics.merge(&stats);
                    combinations.extend(found);
                    if let TerminationReason::Aborted(reason) = reason {
                        abort_reason = Some(reason);
                        break;
                    }
                }
            }
        }

        if combinations.len() > limit_len {
            combinations.truncate(limit_len);
            abort_reason.get_or_insert_with(|| "solution limit reached".to_string());
        }
        statistics.combinations_found = combinations.len() as u64;
        (combinations, abort_reason)
    }

    fn search_sequential(&self, groups: &SubjectGroups<'_>) -> SearchOutcome {
        let stop = AtomicBool::new(false);
        let solutions = AtomicU64::new(0);
        let mut monitor = self.worker_monitor(&stop, &solutions);
        CombinationSearch::new(groups).search(&mut monitor)
    }

    fn worker_monitor<'m>(
        &self,
        stop: &'m AtomicBool,
        solutions: &'m AtomicU64,
    ) -> CompositeMonitor<'m> {
        self.monitor_stack(stop, solutions, self.time_limit, self.log_interval)
    }

    fn monitor_stack<'m>(
        &self,
        stop: &'m AtomicBool,
        solutions: &'m AtomicU64,
        time_limit: Option<Duration>,
        log_interval: Option<Duration>,
    ) -> CompositeMonitor<'m> {
        let mut monitor = CompositeMonitor::with_capacity(4);
        monitor.add_monitor(InterruptMonitor::new(stop));
        if let Some(limit) = self.solution_limit {
            monitor.add_monitor(SolutionLimitMonitor::new(solutions, limit));
        }
        if let Some(limit) = time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        if let Some(interval) = log_interval {
            monitor.add_monitor(LogMonitor::new(interval, 4095));
        }
        monitor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{group::SubjectGroup, monitor::no_op::NoOpMonitor};
    use horario_model::{
        offering::{Offering, OfferingId},
        time::TimeInterval,
        weekday::Weekday,
    };
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_offerings(seed: u64, subjects: usize, per_subject: usize) -> Vec<Offering> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut offerings = Vec::new();
        let mut id = 0u32;
        for subject in 0..subjects {
            for _ in 0..per_subject {
                id += 1;
                let mut o = Offering::new(OfferingId::new(id), format!("S{subject}"), "K", "1", "P");
                for _ in 0..rng.random_range(1..=3) {
                    let day = Weekday::ALL[rng.random_range(0..Weekday::COUNT)];
                    let hour: u16 = rng.random_range(7..20);
                    let interval = TimeInterval::new(hour * 100, hour * 100 + 59).unwrap();
                    let _ = o.register_session(day, interval, None);
                }
                offerings.push(o);
            }
        }
        offerings
    }

    fn groups_of(offerings: &[Offering], subjects: usize) -> SubjectGroups<'_> {
        let mut groups = SubjectGroups::new();
        for s in 0..subjects {
            let name = format!("S{s}");
            let candidates = offerings.iter().filter(|o| o.subject() == name).collect();
            groups.push(SubjectGroup::with_candidates(name, candidates));
        }
        groups
    }

    #[test]
    fn test_parallel_equals_sequential() {
        for seed in 0..5 {
            let offerings = random_offerings(seed, 4, 6);
            let groups = groups_of(&offerings, 4);

            let sequential = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
            let parallel = ParallelCombinationSearch::new(3).search(&groups);

            assert!(parallel.is_exhausted());
            assert_eq!(parallel.combinations(), sequential.combinations());
            assert_eq!(
                parallel.statistics().nodes_explored,
                sequential.statistics().nodes_explored
            );
            assert_eq!(
                parallel.statistics().prunings,
                sequential.statistics().prunings
            );
        }
    }

    #[test]
    fn test_more_threads_than_roots() {
        let offerings = random_offerings(7, 3, 2);
        let groups = groups_of(&offerings, 3);
        let sequential = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        let parallel = ParallelCombinationSearch::new(16).search(&groups);
        assert_eq!(parallel.combinations(), sequential.combinations());
    }

    #[test]
    fn test_solution_limit_truncates_and_aborts() {
        let offerings = random_offerings(11, 3, 8);
        let groups = groups_of(&offerings, 3);
        let total = CombinationSearch::new(&groups)
            .search(&mut NoOpMonitor::new())
            .len();
        assert!(total > 2, "fixture should have more than two schedules");

        let outcome = ParallelCombinationSearch::new(4)
            .with_solution_limit(2)
            .search(&groups);
        assert!(outcome.is_aborted());
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.statistics().combinations_found, 2);
    }

    fn wide_second_level() -> Vec<Offering> {
        let mut offerings = Vec::new();
        for id in 1..=8 {
            let mut o = Offering::new(OfferingId::new(id), "S0", "K", "1", "P");
            let _ = o.register_session(Weekday::Monday, TimeInterval::hour_range(7, 7), None);
            offerings.push(o);
        }
        for id in 0..50u32 {
            let mut o = Offering::new(OfferingId::new(100 + id), "S1", "K", "1", "P");
            let hour = 7 + (id % 13) as u8;
            let _ = o.register_session(Weekday::Tuesday, TimeInterval::hour_range(hour, hour), None);
            offerings.push(o);
        }
        offerings
    }

    #[test]
    fn test_solution_limit_keeps_sequential_prefix() {
        let offerings = wide_second_level();
        let groups = groups_of(&offerings, 2);

        for limit in [1, 57, 120, 399] {
            let counter = AtomicU64::new(0);
            let sequential =
                CombinationSearch::new(&groups).search(&mut SolutionLimitMonitor::new(&counter, limit));
            assert_eq!(sequential.len(), limit as usize);

            for _ in 0..50 {
                let parallel = ParallelCombinationSearch::new(8)
                    .with_solution_limit(limit)
                    .search(&groups);
                assert!(parallel.is_aborted());
                assert_eq!(parallel.combinations(), sequential.combinations());
                assert_eq!(parallel.statistics().combinations_found, limit);
            }
        }
    }

    #[test]
    fn test_solution_limit_above_total_is_exhausted() {
        let offerings = wide_second_level();
        let groups = groups_of(&offerings, 2);
        let sequential = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        assert_eq!(sequential.len(), 400);

        let parallel = ParallelCombinationSearch::new(8)
            .with_solution_limit(1_000)
            .search(&groups);
        assert!(parallel.is_exhausted());
        assert_eq!(parallel.combinations(), sequential.combinations());
    }

    #[test]
    fn test_degenerate_groups_fall_back_to_sequential() {
        let empty = SubjectGroups::new();
        let outcome = ParallelCombinationSearch::new(4).search(&empty);
        assert_eq!(outcome.combinations(), &[Combination::new()]);

        let offerings = random_offerings(3, 1, 2);
        let mut groups = groups_of(&offerings, 1);
        groups.push(SubjectGroup::new("missing"));
        let outcome = ParallelCombinationSearch::new(4).search(&groups);
        assert!(outcome.is_empty());
        assert!(outcome.is_exhausted());
    }

    #[test]
    fn test_zero_threads_is_one() {
        assert_eq!(ParallelCombinationSearch::new(0).threads(), 1);
    }
}
