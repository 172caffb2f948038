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

use crate::{combination::Combination, stats::SearchStatistics};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every branch of the tree was explored; the result set is complete.
    Exhausted,
    /// A monitor stopped the search. The string says why.
    /// The combinations found before stopping are still reported.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Exhausted"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// Everything a search run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    combinations: Vec<Combination>,
    reason: TerminationReason,
    statistics: SearchStatistics,
}

impl SearchOutcome {
    #[inline]
    pub fn new(
        combinations: Vec<Combination>,
        reason: TerminationReason,
        statistics: SearchStatistics,
    ) -> Self {
        Self {
            combinations,
            reason,
            statistics,
        }
    }

    #[inline]
    pub fn exhausted(combinations: Vec<Combination>, statistics: SearchStatistics) -> Self {
        Self::new(combinations, TerminationReason::Exhausted, statistics)
    }

    #[inline]
    pub fn aborted<R>(combinations: Vec<Combination>, reason: R, statistics: SearchStatistics) -> Self
    where
        R: Into<String>,
    {
        Self::new(
            combinations,
            TerminationReason::Aborted(reason.into()),
            statistics,
        )
    }

    #[inline]
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    #[inline]
    pub fn into_combinations(self) -> Vec<Combination> {
        self.combinations
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.reason
    }

    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        matches!(self.reason, TerminationReason::Exhausted)
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self.reason, TerminationReason::Aborted(_))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Splits the outcome into its parts.
    #[inline]
    pub fn into_parts(self) -> (Vec<Combination>, TerminationReason, SearchStatistics) {
        (self.combinations, self.reason, self.statistics)
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchOutcome(combinations: {}, termination_reason: {})",
            self.combinations.len(),
            self.reason
        )
    }
}
