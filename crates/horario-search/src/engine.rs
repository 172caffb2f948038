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

//! # Combination Search
//!
//! Depth-first enumeration of every conflict-free schedule that picks one
//! candidate per subject group.
//!
//! Level `d` of the tree corresponds to subject group `d`. At each node the
//! candidates of the current group are tried in order; a candidate that
//! collides with any session already in the partial schedule is pruned,
//! every other candidate produces a new child combination. A node below the
//! last group is a complete schedule and is emitted.
//!
//! The output order is the lexicographic order of candidate positions, so two
//! runs over the same groups return the same list.
//!
//! ## Edge cases
//!
//! - No groups at all: the empty combination is the one and only schedule.
//! - Any empty group: no schedule exists; the search returns immediately.
//! - A group with a single candidate: that candidate is in every schedule.
//!
//! ## Control
//!
//! The monitor sees every node through `on_step` and is asked for a
//! `SearchCommand` right after. A `Terminate` unwinds the recursion and the
//! search returns what it found so far as `TerminationReason::Aborted`.

use crate::{
    combination::Combination,
    group::SubjectGroups,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::SearchOutcome,
    stats::SearchStatistics,
};
use horario_model::index::SubjectIndex;
use std::ops::ControlFlow;

/// Sequential backtracking search over a set of subject groups.
#[derive(Debug, Clone, Copy)]
pub struct CombinationSearch<'g, 'a> {
    groups: &'g SubjectGroups<'a>,
}

impl<'g, 'a> CombinationSearch<'g, 'a> {
    #[inline]
    pub fn new(groups: &'g SubjectGroups<'a>) -> Self {
        Self { groups }
    }

    #[inline]
    pub fn groups(&self) -> &'g SubjectGroups<'a> {
        self.groups
    }

    /// Enumerates every schedule, reporting to `monitor`.
    ///
    /// Calls `on_enter_search` before the first node and `on_exit_search`
    /// after the last one.
    pub fn search<M>(&self, monitor: &mut M) -> SearchOutcome
    where
        M: SearchMonitor + ?Sized,
    {
        monitor.on_enter_search(self.groups);
        let outcome = self.explore(SubjectIndex::new(0), Combination::new(), monitor);
        monitor.on_exit_search(outcome.statistics());

        tracing::debug!(
            found = outcome.len(),
            nodes = outcome.statistics().nodes_explored,
            pruned = outcome.statistics().prunings,
            reason = %outcome.termination_reason(),
            "combination search finished"
        );
        outcome
    }

    /// Enumerates every completion of `seed` using the groups from `level` on.
    ///
    /// `seed` must already hold one offering for each group before `level`.
    /// This does not call the monitor's enter and exit hooks, so a caller can
    /// explore several sub-trees under one monitor lifecycle.
    pub fn explore<M>(&self, level: SubjectIndex, seed: Combination, monitor: &mut M) -> SearchOutcome
    where
        M: SearchMonitor + ?Sized,
    {
        debug_assert!(
            level.get() <= self.groups.len(),
            "called `CombinationSearch::explore` with level out of bounds: the len is {} but the level is {}",
            self.groups.len(),
            level.get()
        );
        debug_assert_eq!(seed.len(), level.get());

        let start_time = std::time::Instant::now();

        if let Some(empty) = self.groups.first_empty() {
            tracing::debug!(
                subject = empty.subject(),
                "subject has no candidates; no schedule can exist"
            );
            let mut statistics = SearchStatistics::new();
            statistics.set_total_time(start_time.elapsed());
            return SearchOutcome::exhausted(Vec::new(), statistics);
        }

        let mut session = SearchSession {
            groups: self.groups,
            monitor,
            statistics: SearchStatistics::new(),
            found: Vec::new(),
        };

        let flow = session.visit(level.get(), seed);
        let SearchSession {
            mut statistics,
            found,
            ..
        } = session;
        statistics.set_total_time(start_time.elapsed());

        match flow {
            ControlFlow::Continue(()) => SearchOutcome::exhausted(found, statistics),
            ControlFlow::Break(reason) => SearchOutcome::aborted(found, reason, statistics),
        }
    }
}

/// State of one running search.
struct SearchSession<'s, 'g, 'a, M: ?Sized> {
    groups: &'g SubjectGroups<'a>,
    monitor: &'s mut M,
    statistics: SearchStatistics,
    found: Vec<Combination>,
}

impl<M> SearchSession<'_, '_, '_, M>
where
    M: SearchMonitor + ?Sized,
{
    fn visit(&mut self, depth: usize, partial: Combination) -> ControlFlow<String> {
        self.statistics.on_node(depth);
        self.monitor.on_step(&self.statistics);
        if let SearchCommand::Terminate(reason) = self.monitor.search_command() {
            return ControlFlow::Break(reason);
        }

        let groups = self.groups;
        if depth == groups.len() {
            self.statistics.on_combination_found();
            self.monitor.on_combination_found(&partial);
            self.found.push(partial);
            return ControlFlow::Continue(());
        }

        let group = groups.group(SubjectIndex::new(depth));
        for &candidate in group.candidates() {
            if !partial.can_extend(candidate) {
                self.statistics.on_prune();
                self.monitor.on_prune(candidate, depth);
                tracing::trace!(offering = %candidate.id(), depth, "candidate pruned");
                continue;
            }
            self.visit(depth + 1, partial.extended(candidate))?;
        }

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        group::SubjectGroup,
        monitor::{
            composite::CompositeMonitor, interrupt::InterruptMonitor, no_op::NoOpMonitor,
            solution_limit::SolutionLimitMonitor,
        },
        result::TerminationReason,
    };
    use horario_model::{
        offering::{Offering, OfferingId},
        time::TimeInterval,
        weekday::Weekday,
    };
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicBool, AtomicU64};

    fn offering(id: u32, subject: &str, meetings: &[(Weekday, &str)]) -> Offering {
        let mut o = Offering::new(OfferingId::new(id), subject, "K", "1", "P");
        for &(day, time) in meetings {
            o.register_session(day, TimeInterval::parse(time).unwrap(), None)
                .unwrap();
        }
        o
    }

    fn chosen(outcome: &SearchOutcome) -> Vec<Vec<u32>> {
        outcome
            .combinations()
            .iter()
            .map(|c| c.chosen().iter().map(|id| id.get()).collect())
            .collect()
    }

    fn scenario_a() -> Vec<Offering> {
        vec![
            offering(1, "S1", &[(Weekday::Monday, "0700-0759")]),
            offering(2, "S1", &[(Weekday::Monday, "0800-0859")]),
            offering(3, "S2", &[(Weekday::Monday, "0700-0759")]),
            offering(4, "S2", &[(Weekday::Monday, "1000-1159")]),
        ]
    }

    fn groups_of<'a>(offerings: &'a [Offering], subjects: &[&str]) -> SubjectGroups<'a> {
        let mut groups = SubjectGroups::new();
        for &subject in subjects {
            let candidates = offerings.iter().filter(|o| o.subject() == subject).collect();
            groups.push(SubjectGroup::with_candidates(subject, candidates));
        }
        groups
    }

    #[test]
    fn test_scenario_a_two_subjects_on_monday() {
        let offerings = scenario_a();
        let groups = groups_of(&offerings, &["S1", "S2"]);
        let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());

        assert!(outcome.is_exhausted());
        assert_eq!(chosen(&outcome), vec![vec![1, 4], vec![2, 3], vec![2, 4]]);
        assert!(outcome.combinations().iter().all(Combination::is_conflict_free));

        let stats = outcome.statistics();
        assert_eq!(stats.combinations_found, 3);
        assert_eq!(stats.prunings, 1);
        // Root, two level-one nodes, three leaves.
        assert_eq!(stats.nodes_explored, 6);
        assert_eq!(stats.max_depth, 2);
    }

    #[test]
    fn test_no_groups_yields_single_empty_combination() {
        let groups = SubjectGroups::new();
        let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        assert_eq!(outcome.combinations(), &[Combination::new()]);
        assert!(outcome.is_exhausted());
    }

    #[test]
    fn test_empty_group_yields_nothing() {
        let offerings = scenario_a();
        let mut groups = groups_of(&offerings, &["S1", "S2"]);
        groups.push(SubjectGroup::new("S3"));
        let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        assert!(outcome.is_empty());
        assert!(outcome.is_exhausted());
        assert_eq!(outcome.statistics().nodes_explored, 0);
    }

    #[test]
    fn test_single_candidate_is_forced() {
        let offerings = vec![
            offering(1, "A", &[(Weekday::Tuesday, "0700-0859")]),
            offering(2, "B", &[(Weekday::Tuesday, "0900-0959")]),
            offering(3, "B", &[(Weekday::Thursday, "0700-0859")]),
        ];
        let groups = groups_of(&offerings, &["A", "B"]);
        let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        assert_eq!(chosen(&outcome), vec![vec![1, 2], vec![1, 3]]);
    }

    #[test]
    fn test_fully_colliding_subjects_yield_nothing() {
        let offerings = vec![
            offering(1, "A", &[(Weekday::Monday, "0700-0859")]),
            offering(2, "B", &[(Weekday::Monday, "0800-0959")]),
        ];
        let groups = groups_of(&offerings, &["A", "B"]);
        let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        assert!(outcome.is_empty());
        assert!(outcome.is_exhausted());
    }

    #[test]
    fn test_sessions_are_merged_per_weekday() {
        let offerings = vec![
            offering(1, "A", &[(Weekday::Monday, "0700-0759"), (Weekday::Wednesday, "0700-0759")]),
            offering(2, "B", &[(Weekday::Monday, "0800-0859")]),
        ];
        let groups = groups_of(&offerings, &["A", "B"]);
        let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());
        let c = &outcome.combinations()[0];
        assert_eq!(c.sessions(Weekday::Monday).len(), 2);
        assert_eq!(c.sessions(Weekday::Wednesday).len(), 1);
        assert!(c.sessions(Weekday::Friday).is_empty());
    }

    #[test]
    fn test_solution_limit_aborts_with_partial_results() {
        let offerings = scenario_a();
        let groups = groups_of(&offerings, &["S1", "S2"]);
        let counter = AtomicU64::new(0);
        let mut monitor = SolutionLimitMonitor::new(&counter, 2);
        let outcome = CombinationSearch::new(&groups).search(&mut monitor);

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("solution limit reached".to_string())
        );
        assert_eq!(chosen(&outcome), vec![vec![1, 4], vec![2, 3]]);
    }

    #[test]
    fn test_interrupt_before_start_returns_nothing() {
        let offerings = scenario_a();
        let groups = groups_of(&offerings, &["S1", "S2"]);
        let flag = AtomicBool::new(true);
        let mut monitor = CompositeMonitor::new();
        monitor.add_monitor(InterruptMonitor::new(&flag));
        let outcome = CombinationSearch::new(&groups).search(&mut monitor);
        assert!(outcome.is_aborted());
        assert!(outcome.is_empty());
        assert_eq!(outcome.statistics().nodes_explored, 1);
    }

    #[test]
    fn test_explore_from_seed() {
        let offerings = scenario_a();
        let groups = groups_of(&offerings, &["S1", "S2"]);
        let seed = Combination::new().extended(&offerings[1]);
        let outcome = CombinationSearch::new(&groups).explore(
            SubjectIndex::new(1),
            seed,
            &mut NoOpMonitor::new(),
        );
        assert_eq!(chosen(&outcome), vec![vec![2, 3], vec![2, 4]]);
    }

    #[test]
    fn test_works_with_dyn_monitor() {
        let offerings = scenario_a();
        let groups = groups_of(&offerings, &["S1", "S2"]);
        let mut boxed: Box<dyn SearchMonitor> = Box::new(NoOpMonitor::new());
        let outcome = CombinationSearch::new(&groups).search(boxed.as_mut());
        assert_eq!(outcome.len(), 3);
    }

    /// Every selection of one candidate per group whose sessions are pairwise disjoint.
    fn brute_force(groups: &SubjectGroups<'_>) -> Vec<Vec<u32>> {
        let mut result: Vec<Vec<&Offering>> = vec![Vec::new()];
        for group in groups {
            let mut next = Vec::new();
            for prefix in &result {
                for &candidate in group.candidates() {
                    let mut picked = prefix.clone();
                    picked.push(candidate);
                    next.push(picked);
                }
            }
            result = next;
        }
        result
            .into_iter()
            .filter(|picked| {
                picked.iter().enumerate().all(|(i, a)| {
                    picked[i + 1..].iter().all(|b| {
                        Weekday::ALL.iter().all(|&day| {
                            a.sessions(day)
                                .iter()
                                .all(|x| b.sessions(day).iter().all(|y| !x.collides(y)))
                        })
                    })
                })
            })
            .map(|picked| picked.iter().map(|o| o.id().get()).collect())
            .collect()
    }

    fn arb_offerings() -> impl Strategy<Value = Vec<Offering>> {
        // (subject, weekday, start hour, length in hours)
        let meeting = (0usize..6, 7u16..19, 1u16..3);
        let offering = (0usize..4, prop::collection::vec(meeting, 0..4));
        prop::collection::vec(offering, 0..12).prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(id, (subject, meetings))| {
                    let mut o = Offering::new(
                        OfferingId::new(id as u32),
                        format!("S{subject}"),
                        "K",
                        "1",
                        "P",
                    );
                    for (day, hour, len) in meetings {
                        let interval = TimeInterval::new(hour * 100, (hour + len) * 100 - 1).unwrap();
                        // Meetings that collide inside the offering are dropped.
                        let _ = o.register_session(Weekday::ALL[day], interval, None);
                    }
                    o
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_search_is_sound_and_complete(offerings in arb_offerings()) {
            let groups = groups_of(&offerings, &["S0", "S1", "S2", "S3"]);
            let outcome = CombinationSearch::new(&groups).search(&mut NoOpMonitor::new());

            prop_assert!(outcome.is_exhausted());
            prop_assert!(outcome.combinations().iter().all(Combination::is_conflict_free));

            let mut found = chosen(&outcome);
            let mut expected = brute_force(&groups);
            found.sort();
            expected.sort();
            prop_assert_eq!(found, expected);
        }
    }
}
