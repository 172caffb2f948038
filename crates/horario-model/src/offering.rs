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

//! Offerings and their per-day session registry.
//!
//! An offering is one scheduled section of a subject: a registration code, a
//! professor and a weekly meeting pattern. The pattern is built one meeting at
//! a time through [`Offering::register_session`], which refuses any meeting
//! that would overlap an earlier one on the same day. Once a session is
//! accepted it is never removed, so the invariant holds for the lifetime of
//! the offering.

use crate::{
    error::ConflictError,
    session::Session,
    time::TimeInterval,
    weekday::{Weekday, WeekdayMap},
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Registration code of an offering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferingId(u32);

impl OfferingId {
    #[inline]
    pub const fn new(code: u32) -> Self {
        Self(code)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for OfferingId {
    #[inline]
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for OfferingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sessions of one offering on one day. Most offerings meet at most twice a day.
pub type DaySessions = SmallVec<[Session; 2]>;

/// One section of a subject together with its weekly meetings.
///
/// # Invariants
///
/// No two sessions stored for the same weekday collide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offering {
    id: OfferingId,
    subject: String,
    key: String,
    section: String,
    professor: String,
    schedule: WeekdayMap<DaySessions>,
}

impl Offering {
    /// Creates an offering that does not meet yet.
    pub fn new<S1, S2, S3, S4>(
        id: OfferingId,
        subject: S1,
        key: S2,
        section: S3,
        professor: S4,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
        S4: Into<String>,
    {
        Self {
            id,
            subject: subject.into(),
            key: key.into(),
            section: section.into(),
            professor: professor.into(),
            schedule: WeekdayMap::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> OfferingId {
        self.id
    }

    /// Returns the subject name, which is what filtering matches on.
    #[inline]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the catalog key of the subject.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn section(&self) -> &str {
        &self.section
    }

    #[inline]
    pub fn professor(&self) -> &str {
        &self.professor
    }

    /// Returns the sessions held on `weekday`, in registration order.
    #[inline]
    pub fn sessions(&self, weekday: Weekday) -> &[Session] {
        &self.schedule[weekday]
    }

    /// Iterates over the days the offering meets, with their sessions.
    pub fn meeting_days(&self) -> impl Iterator<Item = (Weekday, &[Session])> + '_ {
        self.schedule
            .iter()
            .filter(|(_, sessions)| !sessions.is_empty())
            .map(|(day, sessions)| (day, sessions.as_slice()))
    }

    /// Returns the total number of weekly sessions.
    #[inline]
    pub fn num_sessions(&self) -> usize {
        self.schedule.iter().map(|(_, s)| s.len()).sum()
    }

    /// Registers a meeting on `weekday`.
    ///
    /// The meeting is appended unless it collides with a session already held
    /// on that day, in which case the offering is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`ConflictError`] naming the first colliding session.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use horario_model::offering::{Offering, OfferingId};
    /// # use horario_model::time::TimeInterval;
    /// # use horario_model::weekday::Weekday;
    ///
    /// let mut o = Offering::new(OfferingId::new(1), "Data Mining", "CS101", "001", "Ada");
    /// let t = |s: &str| TimeInterval::parse(s).unwrap();
    ///
    /// assert!(o.register_session(Weekday::Monday, t("0700-0759"), None).is_ok());
    /// assert!(o.register_session(Weekday::Monday, t("0730-0829"), None).is_err());
    /// assert!(o.register_session(Weekday::Monday, t("0759-0859"), None).is_ok());
    /// assert_eq!(o.sessions(Weekday::Monday).len(), 2);
    /// ```
    pub fn register_session(
        &mut self,
        weekday: Weekday,
        interval: TimeInterval,
        room: Option<String>,
    ) -> Result<(), ConflictError> {
        let day = &mut self.schedule[weekday];

        if let Some(existing) = day.iter().find(|s| s.interval().collides(&interval)) {
            return Err(ConflictError {
                offering: self.id,
                weekday,
                attempted: interval,
                existing: existing.interval(),
            });
        }

        day.push(Session::new(weekday, interval, room, self.id));
        Ok(())
    }

    /// Returns `true` if none of the sessions on `weekday` collide with any of `intervals`.
    ///
    /// An offering that does not meet on `weekday` is trivially free.
    pub fn is_time_free(&self, weekday: Weekday, intervals: &[TimeInterval]) -> bool {
        self.schedule[weekday]
            .iter()
            .all(|s| !s.interval().collides_with_any(intervals))
    }

    /// Returns a short display code made of the first letter of each word of the subject name.
    ///
    /// `"Tecnologías de la Información"` becomes `"TdlI"`.
    pub fn initials(&self) -> String {
        self.subject
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .collect()
    }

    /// Sorts each day's sessions chronologically for display.
    ///
    /// Sorting never changes which sessions are stored, so the invariant is preserved.
    pub fn sort_sessions(&mut self) {
        for sessions in self.schedule.values_mut() {
            sessions.sort_by_key(Session::sort_key);
        }
    }
}

impl std::fmt::Display for Offering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({} sec. {}) - {}",
            self.id, self.subject, self.key, self.section, self.professor
        )
    }
}
