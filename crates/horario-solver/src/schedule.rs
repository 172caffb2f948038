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

//! Final assembly of the schedules handed to rendering.

use crate::{render::ScheduleTable, stats::SolverStatistics};
use horario_model::catalog::Catalog;
use horario_search::{combination::Combination, result::TerminationReason};

/// Sorts every weekday of every combination chronologically.
///
/// Sorting is stable, so sessions starting and ending together keep their
/// merge order.
pub fn finalize(combinations: Vec<Combination>) -> Vec<Combination> {
    combinations
        .into_iter()
        .map(Combination::into_sorted)
        .collect()
}

/// The schedules of one solve, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    schedules: Vec<Combination>,
    reason: TerminationReason,
    statistics: SolverStatistics,
}

impl ScheduleOutcome {
    #[inline]
    pub fn new(
        schedules: Vec<Combination>,
        reason: TerminationReason,
        statistics: SolverStatistics,
    ) -> Self {
        Self {
            schedules,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn schedules(&self) -> &[Combination] {
        &self.schedules
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Returns `true` if the search explored everything, so no schedule is missing.
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self.reason, TerminationReason::Exhausted)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Renders every schedule against `catalog`.
    pub fn tables<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = ScheduleTable<'a>> + 'a {
        self.schedules
            .iter()
            .map(move |schedule| ScheduleTable::new(catalog, schedule))
    }
}

impl std::fmt::Display for ScheduleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScheduleOutcome(schedules: {}, termination_reason: {})",
            self.schedules.len(),
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horario_model::{
        offering::{Offering, OfferingId},
        time::TimeInterval,
        weekday::Weekday,
    };

    #[test]
    fn test_finalize_sorts_each_weekday() {
        let mut late = Offering::new(OfferingId::new(1), "Late", "K", "1", "P");
        late.register_session(Weekday::Monday, TimeInterval::parse("1500-1659").unwrap(), None)
            .unwrap();
        let mut early = Offering::new(OfferingId::new(2), "Early", "K", "1", "P");
        early
            .register_session(Weekday::Monday, TimeInterval::parse("0700-0859").unwrap(), None)
            .unwrap();

        let merged = Combination::new().extended(&late).extended(&early);
        let finalized = finalize(vec![merged]);
        let starts: Vec<_> = finalized[0]
            .sessions(Weekday::Monday)
            .iter()
            .map(|s| s.interval().start())
            .collect();
        assert_eq!(starts, vec![700, 1500]);
        assert_eq!(finalized[0].chosen(), &[OfferingId::new(1), OfferingId::new(2)]);
    }
}
