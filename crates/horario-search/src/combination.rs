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

//! A partial or complete schedule: the offerings chosen so far and all of
//! their meetings merged per weekday.

use horario_model::{
    offering::{Offering, OfferingId},
    session::Session,
    weekday::{Weekday, WeekdayMap},
};

/// Chosen offerings, one per subject level, plus their merged weekly sessions.
///
/// Combinations are values: extending one produces a new, independent
/// combination and leaves the original untouched, so sibling branches of the
/// search never observe each other's choices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Combination {
    chosen: Vec<OfferingId>,
    schedule: WeekdayMap<Vec<Session>>,
}

impl Combination {
    /// Creates an empty combination.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chosen offering codes, in subject order.
    #[inline]
    pub fn chosen(&self) -> &[OfferingId] {
        &self.chosen
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: OfferingId) -> bool {
        self.chosen.contains(&id)
    }

    /// Returns every session held on `weekday`.
    #[inline]
    pub fn sessions(&self, weekday: Weekday) -> &[Session] {
        &self.schedule[weekday]
    }

    /// Iterates over the weekdays that have at least one session.
    pub fn meeting_days(&self) -> impl Iterator<Item = (Weekday, &[Session])> + '_ {
        self.schedule
            .iter()
            .filter(|(_, sessions)| !sessions.is_empty())
            .map(|(day, sessions)| (day, sessions.as_slice()))
    }

    /// Returns `true` if none of `offering`'s meetings collides with a session already in the combination.
    pub fn can_extend(&self, offering: &Offering) -> bool {
        offering.meeting_days().all(|(day, incoming)| {
            let existing = &self.schedule[day];
            incoming
                .iter()
                .all(|s| !existing.iter().any(|e| e.collides(s)))
        })
    }

    /// Returns a new combination with `offering` appended.
    ///
    /// The caller is expected to have checked [`Combination::can_extend`];
    /// this is only asserted in debug builds.
    pub fn extended(&self, offering: &Offering) -> Combination {
        debug_assert!(
            self.can_extend(offering),
            "called `Combination::extended` with colliding offering {}",
            offering.id()
        );

        let mut next = self.clone();
        next.chosen.push(offering.id());
        for (day, sessions) in offering.meeting_days() {
            next.schedule[day].extend_from_slice(sessions);
        }
        next
    }

    /// Returns `true` if no two sessions on the same weekday overlap.
    pub fn is_conflict_free(&self) -> bool {
        self.schedule.iter().all(|(_, sessions)| {
            sessions
                .iter()
                .enumerate()
                .all(|(i, a)| sessions[i + 1..].iter().all(|b| !a.collides(b)))
        })
    }

    /// Sorts each weekday's sessions chronologically. The sort is stable.
    pub fn sort_sessions(&mut self) {
        for sessions in self.schedule.values_mut() {
            sessions.sort_by_key(Session::sort_key);
        }
    }

    #[inline]
    pub fn into_sorted(mut self) -> Self {
        self.sort_sessions();
        self
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids = self
            .chosen
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Combination([{}])", ids)
    }
}
