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

//! Error taxonomy of the model layer.
//!
//! Parsing failures (`TimeParseError`, `WeekdayParseError`) are fatal to the
//! single call that produced them. A `ConflictError` is an expected outcome of
//! `Offering::register_session`; the ingester decides whether the row is
//! dropped or ingestion stops.

use crate::{offering::OfferingId, time::TimeInterval, weekday::Weekday};

/// The time text could not be turned into a `TimeInterval`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    /// The text is not exactly `hhmm-hhmm`.
    #[error("time range '{text}' is not in the 'hhmm-hhmm' format")]
    Format { text: String },
    /// The start is not strictly before the end.
    #[error("time range {start:04}-{end:04} does not end after it starts")]
    Range { start: u16, end: u16 },
}

impl TimeParseError {
    #[inline]
    pub(crate) fn format(text: &str) -> Self {
        Self::Format {
            text: text.to_string(),
        }
    }
}

/// The weekday text is not one of the six catalog codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday code '{code}', expected one of L, A, M, J, V, S")]
pub struct WeekdayParseError {
    /// The offending text, trimmed.
    pub code: String,
}

/// A session would overlap another session of the same offering on the same day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "offering {offering} already meets on {weekday} at {existing}, which overlaps {attempted}"
)]
pub struct ConflictError {
    /// The offering that rejected the session.
    pub offering: OfferingId,
    /// The day both sessions fall on.
    pub weekday: Weekday,
    /// The interval that was rejected.
    pub attempted: TimeInterval,
    /// The first registered interval it collides with.
    pub existing: TimeInterval,
}

/// A raw catalog row could not be applied to a `Catalog`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Weekday(#[from] WeekdayParseError),
    #[error(transparent)]
    Time(#[from] TimeParseError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    /// An offering with the same identifier is already registered.
    #[error("offering {0} is already part of the catalog")]
    DuplicateOffering(OfferingId),
}

impl CatalogError {
    /// Returns `true` if the row was well-formed but overlapped an earlier meeting.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, CatalogError::Conflict(_))
    }
}

/// Failure while loading a catalog from a CSV source.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A row was read but rejected by the catalog.
    #[error("line {line}: {source}")]
    Record {
        line: u64,
        #[source]
        source: CatalogError,
    },
}
