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

//! The catalog: an explicit registry of offerings keyed by their code.
//!
//! Raw catalog rows describe one meeting each, so an offering that meets on
//! several days appears in several rows sharing the same code. `Catalog::ingest`
//! folds those rows into one `Offering`, validating the weekday and time text
//! before anything is created so that a malformed row never leaves a
//! half-initialized offering behind.

use crate::{
    error::CatalogError,
    index::OfferingIndex,
    offering::{Offering, OfferingId},
    time::TimeInterval,
    weekday::Weekday,
};
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// One raw catalog row, as read from the data source.
///
/// Weekday and time are kept as text; they are validated by [`Catalog::ingest`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct OfferingRecord {
    pub id: OfferingId,
    pub key: String,
    pub subject: String,
    pub section: String,
    pub weekday: String,
    pub time: String,
    pub professor: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub room: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|room| !room.trim().is_empty()))
}

/// All offerings known to the program, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    offerings: Vec<Offering>,
    positions: FxHashMap<OfferingId, OfferingIndex>,
}

impl Catalog {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    /// Applies one raw row to the catalog.
    ///
    /// The first row seen for a code creates the offering; later rows only add
    /// meetings. Subject, key, section and professor of later rows are ignored.
    ///
    /// # Errors
    ///
    /// * [`CatalogError::Weekday`] or [`CatalogError::Time`] if the row is malformed.
    ///   Nothing is registered in that case.
    /// * [`CatalogError::Conflict`] if the meeting overlaps an earlier meeting of
    ///   the same offering on the same day. The offering is kept as it was.
    pub fn ingest(&mut self, record: &OfferingRecord) -> Result<OfferingIndex, CatalogError> {
        let weekday: Weekday = record.weekday.parse()?;
        let interval = TimeInterval::parse(record.time.trim())?;

        let index = match self.positions.get(&record.id) {
            Some(&index) => {
                let existing = &self.offerings[index.get()];
                if existing.subject() != record.subject || existing.professor() != record.professor
                {
                    tracing::debug!(
                        offering = %record.id,
                        kept_subject = existing.subject(),
                        row_subject = %record.subject,
                        "row disagrees with first row of the offering; keeping the first"
                    );
                }
                index
            }
            None => self.push(Offering::new(
                record.id,
                record.subject.as_str(),
                record.key.as_str(),
                record.section.as_str(),
                record.professor.as_str(),
            )),
        };

        self.offerings[index.get()].register_session(weekday, interval, record.room.clone())?;
        Ok(index)
    }

    /// Adds a fully built offering.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateOffering`] if the code is already registered.
    pub fn insert(&mut self, offering: Offering) -> Result<OfferingIndex, CatalogError> {
        if self.positions.contains_key(&offering.id()) {
            return Err(CatalogError::DuplicateOffering(offering.id()));
        }
        Ok(self.push(offering))
    }

    fn push(&mut self, offering: Offering) -> OfferingIndex {
        let index = OfferingIndex::new(self.offerings.len());
        self.positions.insert(offering.id(), index);
        self.offerings.push(offering);
        index
    }

    #[inline]
    pub fn index_of(&self, id: OfferingId) -> Option<OfferingIndex> {
        self.positions.get(&id).copied()
    }

    #[inline]
    pub fn get(&self, id: OfferingId) -> Option<&Offering> {
        self.index_of(id).map(|index| &self.offerings[index.get()])
    }

    /// Returns the offering at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn offering(&self, index: OfferingIndex) -> &Offering {
        &self.offerings[index.get()]
    }

    #[inline]
    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Offering> {
        self.offerings.iter()
    }

    /// Sorts every offering's sessions chronologically.
    pub fn sort_sessions(&mut self) {
        self.offerings.iter_mut().for_each(Offering::sort_sessions);
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Offering;
    type IntoIter = std::slice::Iter<'a, Offering>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Catalog ({} offerings)", self.len())?;
        for offering in &self.offerings {
            writeln!(f, "  {}", offering)?;
            for (_, sessions) in offering.meeting_days() {
                for session in sessions {
                    writeln!(f, "    {}", session)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimeParseError;

    fn record(id: u32, subject: &str, weekday: &str, time: &str) -> OfferingRecord {
        OfferingRecord {
            id: OfferingId::new(id),
            key: "K".into(),
            subject: subject.into(),
            section: "1".into(),
            weekday: weekday.into(),
            time: time.into(),
            professor: "P".into(),
            room: Some("R".into()),
        }
    }

    #[test]
    fn test_rows_with_same_code_merge() {
        let mut catalog = Catalog::new();
        let a = catalog.ingest(&record(10, "Algebra", "L", "0700-0859")).unwrap();
        let b = catalog.ingest(&record(10, "Algebra", "M", "0700-0859")).unwrap();
        assert_eq!(a, b);
        assert_eq!(catalog.len(), 1);

        let offering = catalog.get(OfferingId::new(10)).unwrap();
        assert_eq!(offering.num_sessions(), 2);
        assert_eq!(offering.sessions(Weekday::Monday).len(), 1);
        assert_eq!(offering.sessions(Weekday::Wednesday).len(), 1);
    }

    #[test]
    fn test_first_row_metadata_wins() {
        let mut catalog = Catalog::new();
        catalog.ingest(&record(10, "Algebra", "L", "0700-0859")).unwrap();
        catalog.ingest(&record(10, "Calculus", "A", "0700-0859")).unwrap();
        assert_eq!(catalog.get(OfferingId::new(10)).unwrap().subject(), "Algebra");
    }

    #[test]
    fn test_conflicting_row_is_rejected_and_offering_kept() {
        let mut catalog = Catalog::new();
        catalog.ingest(&record(10, "Algebra", "L", "0700-0859")).unwrap();
        let err = catalog
            .ingest(&record(10, "Algebra", "L", "0800-0959"))
            .unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(catalog.get(OfferingId::new(10)).unwrap().num_sessions(), 1);
    }

    #[test]
    fn test_malformed_row_creates_nothing() {
        let mut catalog = Catalog::new();
        let err = catalog.ingest(&record(1, "Algebra", "X", "0700-0859")).unwrap_err();
        assert!(matches!(err, CatalogError::Weekday(_)));

        let err = catalog.ingest(&record(1, "Algebra", "L", "07:00-08:59")).unwrap_err();
        assert!(matches!(err, CatalogError::Time(TimeParseError::Format { .. })));

        let err = catalog.ingest(&record(1, "Algebra", "L", "0900-0800")).unwrap_err();
        assert!(matches!(err, CatalogError::Time(TimeParseError::Range { .. })));

        assert!(catalog.is_empty());
        assert_eq!(catalog.index_of(OfferingId::new(1)), None);
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        let mut catalog = Catalog::new();
        catalog.ingest(&record(30, "S", "L", "0900-0959")).unwrap();
        catalog.ingest(&record(10, "S", "L", "0700-0759")).unwrap();
        catalog.ingest(&record(20, "S", "L", "0800-0859")).unwrap();
        catalog.ingest(&record(10, "S", "A", "0700-0759")).unwrap();
        let ids: Vec<u32> = catalog.iter().map(|o| o.id().get()).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(catalog.index_of(OfferingId::new(20)), Some(OfferingIndex::new(2)));
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut catalog = Catalog::new();
        let o = Offering::new(OfferingId::new(5), "S", "K", "1", "P");
        assert!(catalog.insert(o.clone()).is_ok());
        assert_eq!(
            catalog.insert(o),
            Err(CatalogError::DuplicateOffering(OfferingId::new(5)))
        );
    }

    #[test]
    fn test_display_lists_offerings_and_sessions() {
        let mut catalog = Catalog::new();
        catalog.ingest(&record(10, "Algebra", "L", "0700-0859")).unwrap();
        let text = catalog.to_string();
        assert!(text.starts_with("Catalog (1 offerings)"));
        assert!(text.contains("10 Algebra"));
        assert!(text.contains("L 0700-0859 @ R [10]"));
    }
}
