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

//! Plain-text rendering of a finished schedule.
//!
//! A schedule is printed as a short list of the chosen offerings followed by
//! a weekly grid:
//!
//! ```raw
//! 58469  [RI]   Redes Inalambricas  SORIANO JOSE
//! 58478  [MdD]  Mineria de Datos    VERA PEDRO
//!
//! Time           Monday  Tuesday
//! -------------  ------  -------
//! 07:00 - 07:59  MdD
//! 08:00 - 08:59  MdD     RI
//! ...
//! ```
//!
//! The grid has one row per hour from 07:00 to 20:59 and one column per
//! weekday the schedule actually uses. A cell shows the initials of the first
//! session, in chronological order, that overlaps the hour.

use horario_model::{catalog::Catalog, offering::OfferingId, time::TimeInterval};
use horario_search::combination::Combination;
use std::fmt::{self, Write};

/// First and last hour rows of the grid.
const FIRST_HOUR: u8 = 7;
const LAST_HOUR: u8 = 20;
const COLUMN_GAP: &str = "  ";

/// A `Display` adapter rendering one combination against its catalog.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleTable<'a> {
    catalog: &'a Catalog,
    combination: &'a Combination,
}

impl<'a> ScheduleTable<'a> {
    #[inline]
    pub fn new(catalog: &'a Catalog, combination: &'a Combination) -> Self {
        Self {
            catalog,
            combination,
        }
    }

    fn initials_of(&self, id: OfferingId) -> String {
        self.catalog
            .get(id)
            .map(|o| o.initials())
            .unwrap_or_else(|| id.to_string())
    }

    fn summary_rows(&self) -> Vec<Vec<String>> {
        self.combination
            .chosen()
            .iter()
            .map(|&id| match self.catalog.get(id) {
                Some(o) => vec![
                    id.to_string(),
                    format!("[{}]", o.initials()),
                    o.subject().to_string(),
                    o.professor().to_string(),
                ],
                None => vec![id.to_string(), String::new(), String::new(), String::new()],
            })
            .collect()
    }

    fn grid(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let days: Vec<_> = self.combination.meeting_days().map(|(d, _)| d).collect();

        let header = std::iter::once("Time".to_string())
            .chain(days.iter().map(|d| d.name().to_string()))
            .collect();

        let rows = (FIRST_HOUR..=LAST_HOUR)
            .map(|hour| {
                let block = TimeInterval::hour_block(hour);
                std::iter::once(block.pretty())
                    .chain(days.iter().map(|&day| {
                        self.combination
                            .sessions(day)
                            .iter()
                            .find(|s| s.interval().collides(&block))
                            .map(|s| self.initials_of(s.offering()))
                            .unwrap_or_default()
                    }))
                    .collect()
            })
            .collect();

        (header, rows)
    }
}

/// Writes left-aligned columns separated by two spaces, without trailing blanks.
fn write_columns(
    f: &mut fmt::Formatter<'_>,
    header: Option<&[String]>,
    rows: &[Vec<String>],
) -> fmt::Result {
    let columns = header
        .map(<[String]>::len)
        .into_iter()
        .chain(rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; columns];
    for row in header.into_iter().chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut line = String::new();
    let mut emit = |f: &mut fmt::Formatter<'_>, cells: &mut dyn Iterator<Item = String>| {
        line.clear();
        for (i, (cell, width)) in cells.zip(&widths).enumerate() {
            if i > 0 {
                line.push_str(COLUMN_GAP);
            }
            write!(line, "{:<width$}", cell, width = width)?;
        }
        writeln!(f, "{}", line.trim_end())
    };

    if let Some(header) = header {
        emit(f, &mut header.iter().cloned())?;
        emit(f, &mut widths.clone().into_iter().map(|w| "-".repeat(w)))?;
    }
    for row in rows {
        emit(f, &mut row.iter().cloned())?;
    }
    Ok(())
}

impl fmt::Display for ScheduleTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_columns(f, None, &self.summary_rows())?;
        writeln!(f)?;
        let (header, rows) = self.grid();
        write_columns(f, Some(&header), &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horario_model::{catalog::OfferingRecord, weekday::Weekday};

    fn catalog() -> Catalog {
        let rows = [
            (58478, "Mineria de Datos", "VERA PEDRO", "L", "0700-0859"),
            (58478, "Mineria de Datos", "VERA PEDRO", "M", "0700-0759"),
            (58469, "Redes Inalambricas", "SORIANO JOSE", "L", "1100-1159"),
            (58469, "Redes Inalambricas", "SORIANO JOSE", "L", "2000-2059"),
        ];
        let mut catalog = Catalog::new();
        for (id, subject, professor, day, time) in rows {
            catalog
                .ingest(&OfferingRecord {
                    id: OfferingId::new(id),
                    key: "K".into(),
                    subject: subject.into(),
                    section: "1".into(),
                    weekday: day.into(),
                    time: time.into(),
                    professor: professor.into(),
                    room: None,
                })
                .unwrap();
        }
        catalog
    }

    fn combination(catalog: &Catalog) -> Combination {
        Combination::new()
            .extended(catalog.get(OfferingId::new(58469)).unwrap())
            .extended(catalog.get(OfferingId::new(58478)).unwrap())
            .into_sorted()
    }

    #[test]
    fn test_summary_lists_chosen_offerings_aligned() {
        let catalog = catalog();
        let combination = combination(&catalog);
        let text = ScheduleTable::new(&catalog, &combination).to_string();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("58469  [RI]   Redes Inalambricas  SORIANO JOSE")
        );
        assert_eq!(
            lines.next(),
            Some("58478  [MdD]  Mineria de Datos    VERA PEDRO")
        );
        assert_eq!(lines.next(), Some(""));
    }

    #[test]
    fn test_grid_has_used_days_only_and_hour_rows() {
        let catalog = catalog();
        let combination = combination(&catalog);
        let text = ScheduleTable::new(&catalog, &combination).to_string();
        let grid: Vec<&str> = text.lines().skip(3).collect();

        assert_eq!(grid[0], "Time           Monday  Wednesday");
        assert_eq!(grid[1], "-------------  ------  ---------");
        // Header, rule and 14 hour rows.
        assert_eq!(grid.len(), 16);
        assert_eq!(grid[2], "07:00 - 07:59  MdD     MdD");
        assert_eq!(grid[3], "08:00 - 08:59  MdD");
        assert_eq!(grid[4], "09:00 - 09:59");
        assert_eq!(grid[6], "11:00 - 11:59  RI");
        assert_eq!(grid[15], "20:00 - 20:59  RI");
    }

    #[test]
    fn test_empty_combination_renders_bare_grid() {
        let catalog = Catalog::new();
        let combination = Combination::new();
        let text = ScheduleTable::new(&catalog, &combination).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Time");
        assert_eq!(lines[3], "07:00 - 07:59");
        assert!(combination.sessions(Weekday::Monday).is_empty());
    }
}
