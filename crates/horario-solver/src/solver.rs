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

//! # Schedule Solver
//!
//! Runs the whole pipeline for one configuration:
//!
//! 1. validate the configuration,
//! 2. group the candidates of every wanted subject,
//! 3. enumerate the conflict-free combinations, sequentially or on a worker pool,
//! 4. keep the combinations satisfying the allowlists,
//! 5. sort every weekday chronologically.
//!
//! ```rust
//! use horario_model::loading::CatalogLoader;
//! use horario_solver::{config::ScheduleConfig, solver::ScheduleSolverBuilder};
//!
//! let csv = "\
//! id,key,subject,section,weekday,time,professor,room
//! 1,K1,Algebra,001,L,0700-0859,Ann Lee,
//! 2,K2,Physics,001,L,0800-0959,Bob Ray,
//! 3,K2,Physics,002,M,0800-0959,Bob Ray,
//! ";
//! let catalog = CatalogLoader::new().from_str(csv).unwrap();
//! let config = ScheduleConfig::new(["Algebra", "Physics"]);
//!
//! let solver = ScheduleSolverBuilder::new().with_threads(1).build();
//! let outcome = solver.solve(&catalog, &config).unwrap();
//! assert_eq!(outcome.len(), 1);
//! ```

use crate::{
    config::ScheduleConfig,
    error::SolverError,
    schedule::{finalize, ScheduleOutcome},
    stats::SolverStatisticsBuilder,
};
use horario_model::{catalog::Catalog, loading::CatalogLoader};
use horario_search::{
    engine::CombinationSearch,
    group::SubjectGroups,
    monitor::{
        composite::CompositeMonitor, log::LogMonitor, solution_limit::SolutionLimitMonitor,
        time_limit::TimeLimitMonitor,
    },
    parallel::ParallelCombinationSearch,
    result::SearchOutcome,
};
use std::{
    path::Path,
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

pub struct ScheduleSolver {
    loader: CatalogLoader,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    log_interval: Option<Duration>,
    threads: usize,
}

impl ScheduleSolver {
    #[inline]
    pub fn solution_limit(&self) -> Option<u64> {
        self.solution_limit
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Loads a catalog with the configured loader.
    pub fn load_catalog<P: AsRef<Path>>(&self, path: P) -> Result<Catalog, SolverError> {
        Ok(self.loader.from_path(path)?)
    }

    /// Builds every schedule of `catalog` allowed by `config`.
    ///
    /// A solution or time limit makes the outcome partial; the termination
    /// reason tells which one fired. The solution limit caps the schedules
    /// enumerated by the search, before the allowlists are applied.
    pub fn solve(
        &self,
        catalog: &Catalog,
        config: &ScheduleConfig,
    ) -> Result<ScheduleOutcome, SolverError> {
        let start_time = Instant::now();
        config.validate()?;

        let groups = config.candidate_filter().filter(catalog);
        let candidates: Vec<(String, usize)> = groups
            .iter()
            .map(|group| (group.subject().to_string(), group.len()))
            .collect();
        if let Some(empty) = groups.first_empty() {
            tracing::warn!(subject = empty.subject(), "no candidate left for subject");
        }

        let (used_threads, outcome) = if self.threads <= 1 {
            (1, self.search_sequential(&groups))
        } else {
            (self.threads, self.search_parallel(&groups))
        };
        let (combinations, reason, search_stats) = outcome.into_parts();

        let searched = combinations.len() as u64;
        let schedules = finalize(config.post_filter().apply(catalog, combinations));

        let statistics = SolverStatisticsBuilder::new()
            .candidates(candidates)
            .combinations_searched(searched)
            .schedules(schedules.len() as u64)
            .nodes_explored(search_stats.nodes_explored)
            .prunings(search_stats.prunings)
            .used_threads(used_threads)
            .solve_duration(start_time.elapsed())
            .build();

        tracing::info!(
            schedules = schedules.len(),
            searched,
            reason = %reason,
            elapsed_secs = statistics.solve_duration.as_secs_f64(),
            "schedule search finished"
        );

        Ok(ScheduleOutcome::new(schedules, reason, statistics))
    }

    fn search_sequential(&self, groups: &SubjectGroups<'_>) -> SearchOutcome {
        let solutions = AtomicU64::new(0);
        let mut monitor = CompositeMonitor::with_capacity(3);
        if let Some(limit) = self.solution_limit {
            monitor.add_monitor(SolutionLimitMonitor::new(&solutions, limit));
        }
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit));
        }
        if let Some(interval) = self.log_interval {
            monitor.add_monitor(LogMonitor::new(interval, 4095));
        }

        let outcome = CombinationSearch::new(groups).search(&mut monitor);
        tracing::debug!(
            counted = solutions.load(Ordering::Relaxed),
            "sequential search done"
        );
        outcome
    }

    fn search_parallel(&self, groups: &SubjectGroups<'_>) -> SearchOutcome {
        let mut search = ParallelCombinationSearch::new(self.threads);
        if let Some(limit) = self.solution_limit {
            search = search.with_solution_limit(limit);
        }
        if let Some(limit) = self.time_limit {
            search = search.with_time_limit(limit);
        }
        if let Some(interval) = self.log_interval {
            search = search.with_progress_log(interval);
        }
        search.search(groups)
    }
}

impl std::fmt::Debug for ScheduleSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleSolver")
            .field("solution_limit", &self.solution_limit)
            .field("time_limit", &self.time_limit)
            .field("log_interval", &self.log_interval)
            .field("threads", &self.threads)
            .finish()
    }
}

impl std::fmt::Display for ScheduleSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScheduleSolver(threads: {}, solution_limit: {:?}, time_limit: {:?})",
            self.threads, self.solution_limit, self.time_limit
        )
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleSolverBuilder {
    loader: CatalogLoader,
    solution_limit: Option<u64>,
    time_limit: Option<Duration>,
    log_interval: Option<Duration>,
    threads: usize,
}

impl Default for ScheduleSolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleSolverBuilder {
    /// Starts with no limits and one worker per available core.
    #[inline]
    pub fn new() -> Self {
        Self {
            loader: CatalogLoader::new(),
            solution_limit: None,
            time_limit: None,
            log_interval: None,
            threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }

    #[inline]
    pub fn with_loader(mut self, loader: CatalogLoader) -> Self {
        self.loader = loader;
        self
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

    /// Zero is treated as one.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    #[inline]
    pub fn build(self) -> ScheduleSolver {
        ScheduleSolver {
            loader: self.loader,
            solution_limit: self.solution_limit,
            time_limit: self.time_limit,
            log_interval: self.log_interval,
            threads: self.threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use horario_model::{offering::OfferingId, time::TimeInterval, weekday::Weekday};
    use horario_search::result::TerminationReason;
    use std::io::Write;

    const CATALOG: &str = "\
id,key,subject,section,weekday,time,professor,room
1,K1,Algebra,001,L,0700-0859,Ann Lee,A1
1,K1,Algebra,001,V,0700-0859,Ann Lee,A1
2,K1,Algebra,002,L,1100-1259,Carl Diaz,A2
3,K2,Physics,001,L,0800-0959,Bob Ray,B1
4,K2,Physics,002,M,0800-0959,Dana Fox,B2
5,K3,Chemistry,001,J,0700-0859,Eve Kim,C1
";

    fn catalog() -> Catalog {
        CatalogLoader::new().from_str(CATALOG).unwrap()
    }

    fn chosen(outcome: &ScheduleOutcome) -> Vec<Vec<u32>> {
        outcome
            .schedules()
            .iter()
            .map(|s| s.chosen().iter().map(|id| id.get()).collect())
            .collect()
    }

    fn sequential() -> ScheduleSolver {
        ScheduleSolverBuilder::new().with_threads(1).build()
    }

    #[test]
    fn test_solve_enumerates_conflict_free_schedules() {
        let outcome = sequential()
            .solve(&catalog(), &ScheduleConfig::new(["Algebra", "Physics"]))
            .unwrap();

        // 1 and 3 overlap on Monday 0800-0859.
        assert_eq!(chosen(&outcome), vec![vec![1, 4], vec![2, 3], vec![2, 4]]);
        assert!(outcome.is_complete());
        assert_eq!(outcome.statistics().used_threads, 1);
        assert_eq!(outcome.statistics().combinations_searched, 3);
        assert_eq!(outcome.statistics().schedules, 3);
        assert_eq!(
            outcome.statistics().candidates,
            vec![("Algebra".to_string(), 2), ("Physics".to_string(), 2)]
        );
    }

    #[test]
    fn test_solve_applies_exclusions_and_forbidden_times() {
        let mut config = ScheduleConfig::new(["Algebra", "Physics"]);
        config.exclude_professors = vec!["Dana Fox".into()];
        config
            .forbidden_times
            .insert(Weekday::Monday, vec![TimeInterval::parse("0700-0759").unwrap()]);

        let outcome = sequential().solve(&catalog(), &config).unwrap();
        assert_eq!(chosen(&outcome), vec![vec![2, 3]]);
    }

    #[test]
    fn test_solve_applies_allowlists_after_search() {
        let mut config = ScheduleConfig::new(["Algebra", "Physics"]);
        config.require_offerings = vec![OfferingId::new(4)];

        let outcome = sequential().solve(&catalog(), &config).unwrap();
        assert_eq!(chosen(&outcome), vec![vec![1, 4], vec![2, 4]]);
        assert_eq!(outcome.statistics().combinations_searched, 3);
        assert_eq!(outcome.statistics().schedules, 2);

        config.require_offerings.clear();
        config.require_professors = vec!["Carl Diaz".into(), "Bob Ray".into()];
        let outcome = sequential().solve(&catalog(), &config).unwrap();
        assert_eq!(chosen(&outcome), vec![vec![2, 3]]);
    }

    #[test]
    fn test_unknown_subject_yields_no_schedule() {
        let outcome = sequential()
            .solve(&catalog(), &ScheduleConfig::new(["Algebra", "Biology"]))
            .unwrap();
        assert!(outcome.is_empty());
        assert!(outcome.is_complete());
        assert_eq!(
            outcome.statistics().candidates,
            vec![("Algebra".to_string(), 2), ("Biology".to_string(), 0)]
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = sequential()
            .solve(&catalog(), &ScheduleConfig::new(Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, SolverError::Config(ConfigError::NoSubjects)));

        let err = sequential()
            .solve(&catalog(), &ScheduleConfig::new(["Algebra", "Algebra"]))
            .unwrap_err();
        assert!(matches!(
            err,
            SolverError::Config(ConfigError::DuplicateSubject(ref s)) if s == "Algebra"
        ));
    }

    #[test]
    fn test_solution_limit_returns_partial_outcome() {
        let solver = ScheduleSolverBuilder::new()
            .with_threads(1)
            .with_solution_limit(1)
            .build();
        let outcome = solver
            .solve(&catalog(), &ScheduleConfig::new(["Algebra", "Physics"]))
            .unwrap();
        assert_eq!(chosen(&outcome), vec![vec![1, 4]]);
        assert!(!outcome.is_complete());
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = ScheduleConfig::new(["Algebra", "Physics", "Chemistry"]);
        let expected = sequential().solve(&catalog(), &config).unwrap();
        let outcome = ScheduleSolverBuilder::new()
            .with_threads(4)
            .build()
            .solve(&catalog(), &config)
            .unwrap();

        assert_eq!(outcome.schedules(), expected.schedules());
        assert_eq!(outcome.statistics().used_threads, 4);
        assert!(outcome.is_complete());
    }

    #[test]
    fn test_schedules_are_sorted_per_weekday() {
        let csv = "\
id,key,subject,section,weekday,time,professor,room
1,K1,Late,001,L,1500-1659,P One,
2,K2,Early,001,L,0700-0859,P Two,
";
        let catalog = CatalogLoader::new().from_str(csv).unwrap();
        let outcome = sequential()
            .solve(&catalog, &ScheduleConfig::new(["Late", "Early"]))
            .unwrap();
        let schedule = &outcome.schedules()[0];
        let starts: Vec<_> = schedule
            .sessions(Weekday::Monday)
            .iter()
            .map(|s| s.interval().start())
            .collect();
        assert_eq!(starts, vec![700, 1500]);
        assert_eq!(schedule.chosen(), &[OfferingId::new(1), OfferingId::new(2)]);
    }

    #[test]
    fn test_load_catalog_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let catalog = sequential().load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 5);

        let err = sequential()
            .load_catalog(file.path().with_extension("missing"))
            .unwrap_err();
        assert!(matches!(err, SolverError::Load(_)));
    }
}
