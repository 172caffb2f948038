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

//! Candidate filtering.
//!
//! `CandidateFilter` narrows a catalog down to the offerings that may appear
//! in a schedule and groups them by wanted subject. An offering is kept when
//! its subject is wanted, neither its professor nor its code is excluded, and
//! none of its meetings falls inside a forbidden window of the same weekday.
//! Exclusions are silent apart from `trace` logging.
//!
//! Groups follow the order in which subjects were requested; a subject
//! requested twice gets one group. Candidates inside a group follow catalog
//! order. Together this makes the search output deterministic.

use crate::group::{SubjectGroup, SubjectGroups};
use horario_model::{
    catalog::Catalog,
    offering::{Offering, OfferingId},
    time::TimeInterval,
    weekday::{Weekday, WeekdayMap},
};
use rustc_hash::{FxHashMap, FxHashSet};

/// Why an offering was left out of its subject group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// The offering's subject was not requested.
    UnwantedSubject,
    /// The professor is on the exclusion list.
    Professor,
    /// The offering code is on the exclusion list.
    Offering,
    /// A meeting on this weekday overlaps a forbidden window.
    ForbiddenTime(Weekday),
}

impl std::fmt::Display for Exclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Exclusion::UnwantedSubject => write!(f, "subject not requested"),
            Exclusion::Professor => write!(f, "professor excluded"),
            Exclusion::Offering => write!(f, "offering excluded"),
            Exclusion::ForbiddenTime(day) => write!(f, "meets in a forbidden window on {}", day),
        }
    }
}

/// Selects and groups the offerings eligible for the search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    subjects: Vec<String>,
    excluded_professors: FxHashSet<String>,
    excluded_offerings: FxHashSet<OfferingId>,
    forbidden: WeekdayMap<Vec<TimeInterval>>,
}

impl CandidateFilter {
    /// Creates a filter for the given subjects, in the order groups should appear.
    pub fn new<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut subjects: Vec<String> = subjects.into_iter().map(Into::into).collect();
        let mut seen = FxHashSet::default();
        subjects.retain(|s| seen.insert(s.clone()));

        Self {
            subjects,
            ..Self::default()
        }
    }

    /// Excludes every offering taught by one of `professors`.
    #[inline]
    pub fn exclude_professors<I, S>(mut self, professors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_professors
            .extend(professors.into_iter().map(Into::into));
        self
    }

    #[inline]
    pub fn exclude_offerings<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = OfferingId>,
    {
        self.excluded_offerings.extend(ids);
        self
    }

    /// Forbids meetings overlapping any of `windows` on `weekday`.
    #[inline]
    pub fn forbid_all<I>(mut self, weekday: Weekday, windows: I) -> Self
    where
        I: IntoIterator<Item = TimeInterval>,
    {
        self.forbidden[weekday].extend(windows);
        self
    }

    /// Returns the wanted subjects, deduplicated, in request order.
    #[inline]
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    #[inline]
    pub fn forbidden(&self, weekday: Weekday) -> &[TimeInterval] {
        &self.forbidden[weekday]
    }

    /// Returns why `offering` would be excluded, or `None` if it is a candidate.
    pub fn exclusion(&self, offering: &Offering) -> Option<Exclusion> {
        if !self.subjects.iter().any(|s| s == offering.subject()) {
            return Some(Exclusion::UnwantedSubject);
        }
        if self.excluded_professors.contains(offering.professor()) {
            return Some(Exclusion::Professor);
        }
        if self.excluded_offerings.contains(&offering.id()) {
            return Some(Exclusion::Offering);
        }
        offering
            .meeting_days()
            .map(|(day, _)| day)
            .find(|&day| !offering.is_time_free(day, &self.forbidden[day]))
            .map(Exclusion::ForbiddenTime)
    }

    /// Groups the eligible offerings of `catalog` by wanted subject.
    pub fn filter<'a>(&self, catalog: &'a Catalog) -> SubjectGroups<'a> {
        let mut groups = SubjectGroups::new();
        let mut positions: FxHashMap<&str, usize> = FxHashMap::default();
        let mut slots: Vec<SubjectGroup<'a>> = Vec::with_capacity(self.subjects.len());

        for (i, subject) in self.subjects.iter().enumerate() {
            positions.insert(subject.as_str(), i);
            slots.push(SubjectGroup::new(subject.as_str()));
        }

        for offering in catalog {
            let Some(&slot) = positions.get(offering.subject()) else {
                continue;
            };
            match self.exclusion(offering) {
                None => slots[slot].push(offering),
                Some(reason) => {
                    tracing::trace!(offering = %offering.id(), %reason, "candidate excluded");
                }
            }
        }

        for group in slots {
            tracing::debug!(
                subject = group.subject(),
                candidates = group.len(),
                "subject group built"
            );
            groups.push(group);
        }

        groups
    }
}
