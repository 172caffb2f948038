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

//! CSV catalog loader.
//!
//! `CatalogLoader` reads comma-separated catalog exports into a `Catalog`.
//! Each row describes one weekly meeting; rows sharing a code are folded into
//! one offering by `Catalog::ingest`. The loader decides what happens when a
//! row cannot be applied: a meeting that overlaps an earlier meeting of the
//! same offering is skipped by default, while a malformed row aborts the load
//! by default. Both can be configured independently.
//!
//! The expected header is
//!
//! ```raw
//! id,key,subject,section,weekday,time,professor,room
//! ```
//!
//! Columns are matched by name, so their order does not matter and unknown
//! columns are ignored. The `room` column is optional. Surrounding whitespace
//! in every field is trimmed.

use crate::{
    catalog::{Catalog, OfferingRecord},
    error::{CatalogError, LoadError},
};
use std::{fs::File, io::Read, path::Path};

/// What to do with a row whose meeting overlaps an earlier meeting of the same offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Drop the row, log a warning and continue.
    #[default]
    Skip,
    /// Stop loading and report the row.
    Abort,
}

/// What to do with a row that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidRowPolicy {
    /// Drop the row, log a warning and continue.
    Skip,
    /// Stop loading and report the row.
    #[default]
    Abort,
}

/// A configurable loader for catalog CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLoader {
    conflict: ConflictPolicy,
    invalid_row: InvalidRowPolicy,
    delimiter: u8,
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self {
            conflict: ConflictPolicy::default(),
            invalid_row: InvalidRowPolicy::default(),
            delimiter: b',',
        }
    }
}

/// Tally of a finished load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadSummary {
    pub rows: u64,
    pub skipped_conflicts: u64,
    pub skipped_invalid: u64,
}

impl CatalogLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how same-day overlaps inside one offering are handled.
    #[inline]
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.conflict = policy;
        self
    }

    /// Sets how malformed rows are handled.
    #[inline]
    pub fn on_invalid_row(mut self, policy: InvalidRowPolicy) -> Self {
        self.invalid_row = policy;
        self
    }

    /// Sets the field delimiter. Defaults to `,`.
    #[inline]
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Loads a catalog from any reader.
    pub fn from_reader<R: Read>(&self, rdr: R) -> Result<Catalog, LoadError> {
        self.load_with_summary(rdr).map(|(catalog, _)| catalog)
    }

    /// Loads a catalog from a file path.
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Catalog, LoadError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading catalog");
        let file = File::open(path)?;
        self.from_reader(file)
    }

    /// Loads a catalog from an in-memory string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(&self, s: &str) -> Result<Catalog, LoadError> {
        self.from_reader(s.as_bytes())
    }

    /// Loads a catalog and reports how many rows were read and skipped.
    pub fn load_with_summary<R: Read>(&self, rdr: R) -> Result<(Catalog, LoadSummary), LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(rdr);
        let headers = reader.headers()?.clone();

        let mut catalog = Catalog::new();
        let mut summary = LoadSummary::default();
        let mut row = csv::StringRecord::new();

        while reader.read_record(&mut row)? {
            summary.rows += 1;
            let line = row.position().map_or(0, |p| p.line());

            if row.iter().all(str::is_empty) {
                continue;
            }

            let record: OfferingRecord = match row.deserialize(Some(&headers)) {
                Ok(record) => record,
                Err(e) => match self.invalid_row {
                    InvalidRowPolicy::Skip => {
                        tracing::warn!(line, error = %e, "skipping unreadable catalog row");
                        summary.skipped_invalid += 1;
                        continue;
                    }
                    InvalidRowPolicy::Abort => return Err(LoadError::Csv(e)),
                },
            };

            match catalog.ingest(&record) {
                Ok(_) => {}
                Err(source @ CatalogError::Conflict(_)) => match self.conflict {
                    ConflictPolicy::Skip => {
                        tracing::warn!(line, error = %source, "skipping overlapping meeting");
                        summary.skipped_conflicts += 1;
                    }
                    ConflictPolicy::Abort => return Err(LoadError::Record { line, source }),
                },
                Err(source) => match self.invalid_row {
                    InvalidRowPolicy::Skip => {
                        tracing::warn!(line, error = %source, "skipping invalid catalog row");
                        summary.skipped_invalid += 1;
                    }
                    InvalidRowPolicy::Abort => return Err(LoadError::Record { line, source }),
                },
            }
        }

        tracing::debug!(
            rows = summary.rows,
            offerings = catalog.len(),
            skipped_conflicts = summary.skipped_conflicts,
            skipped_invalid = summary.skipped_invalid,
            "catalog loaded"
        );

        Ok((catalog, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{offering::OfferingId, weekday::Weekday};
    use std::io::Write;

    const HEADER: &str = "id,key,subject,section,weekday,time,professor,room\n";

    fn csv(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    #[test]
    fn test_load_simple_catalog() {
        let data = csv(
            "100,MAT1,Algebra,1,L,0700-0859,Ada,A-1\n\
             100,MAT1,Algebra,1,M,0700-0859,Ada,A-1\n\
             200,FIS1,Physics,1,A,0900-1059,Grace,\n",
        );
        let catalog = CatalogLoader::new().from_str(&data).unwrap();
        assert_eq!(catalog.len(), 2);

        let algebra = catalog.get(OfferingId::new(100)).unwrap();
        assert_eq!(algebra.num_sessions(), 2);
        assert_eq!(algebra.sessions(Weekday::Monday)[0].room(), Some("A-1"));

        let physics = catalog.get(OfferingId::new(200)).unwrap();
        assert_eq!(physics.sessions(Weekday::Tuesday)[0].room(), None);
    }

    #[test]
    fn test_columns_matched_by_name_and_trimmed() {
        let data = "professor , time,weekday,id,subject,key,section,extra\n\
                    Ada, 0700-0859 , L ,7,Algebra,MAT1,1,ignored\n";
        let catalog = CatalogLoader::new().from_str(data).unwrap();
        let o = catalog.get(OfferingId::new(7)).unwrap();
        assert_eq!(o.professor(), "Ada");
        assert_eq!(o.sessions(Weekday::Monday).len(), 1);
    }

    #[test]
    fn test_conflict_skipped_by_default() {
        let data = csv(
            "1,K,S,1,L,0700-0859,P,R\n\
             1,K,S,1,L,0800-0959,P,R\n\
             1,K,S,1,L,0900-0959,P,R\n",
        );
        let (catalog, summary) = CatalogLoader::new()
            .load_with_summary(data.as_bytes())
            .unwrap();
        assert_eq!(catalog.get(OfferingId::new(1)).unwrap().num_sessions(), 2);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.skipped_conflicts, 1);
    }

    #[test]
    fn test_conflict_abort_reports_line() {
        let data = csv(
            "1,K,S,1,L,0700-0859,P,R\n\
             1,K,S,1,L,0800-0959,P,R\n",
        );
        let err = CatalogLoader::new()
            .on_conflict(ConflictPolicy::Abort)
            .from_str(&data)
            .unwrap_err();
        match err {
            LoadError::Record { line, source } => {
                assert_eq!(line, 3);
                assert!(source.is_conflict());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_time_aborts_by_default() {
        let data = csv("1,K,S,1,L,7-9,P,R\n");
        let err = CatalogLoader::new().from_str(&data).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Record {
                source: CatalogError::Time(_),
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_rows_can_be_skipped() {
        let data = csv(
            "1,K,S,1,X,0700-0859,P,R\n\
             abc,K,S,1,L,0700-0859,P,R\n\
             2,K,S,1,L,0700-0859,P,R\n",
        );
        let (catalog, summary) = CatalogLoader::new()
            .on_invalid_row(InvalidRowPolicy::Skip)
            .load_with_summary(data.as_bytes())
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(OfferingId::new(2)).is_some());
        assert_eq!(summary.skipped_invalid, 2);
    }

    #[test]
    fn test_unreadable_row_aborts_by_default() {
        let data = csv("abc,K,S,1,L,0700-0859,P,R\n");
        let err = CatalogLoader::new().from_str(&data).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let data = "id;key;subject;section;weekday;time;professor\n\
                    9;K;S;1;V;1300-1459;P\n";
        let catalog = CatalogLoader::new().delimiter(b';').from_str(data).unwrap();
        assert_eq!(
            catalog.get(OfferingId::new(9)).unwrap().sessions(Weekday::Friday).len(),
            1
        );
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", csv("5,K,S,1,S,0700-0759,P,R\n")).unwrap();
        let catalog = CatalogLoader::new().from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CatalogLoader::new()
            .from_path("/definitely/not/here.csv")
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_header_only_yields_empty_catalog() {
        let catalog = CatalogLoader::new().from_str(HEADER).unwrap();
        assert!(catalog.is_empty());
    }
}
